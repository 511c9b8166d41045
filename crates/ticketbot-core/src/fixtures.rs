//! Static sample data standing in for a real inventory source.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Bus,
    Train,
    Flight,
}

impl TransportMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::Flight => "Flight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketTag {
    Cheapest,
    Fastest,
    Recommended,
}

impl TicketTag {
    pub fn label(&self) -> &'static str {
        match self {
            TicketTag::Cheapest => "Cheapest",
            TicketTag::Fastest => "Fastest",
            TicketTag::Recommended => "Recommended",
        }
    }
}

/// One bookable option shown as a ticket card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TicketOption {
    pub id: &'static str,
    pub mode: TransportMode,
    pub provider: &'static str,
    pub origin: &'static str,
    pub destination: &'static str,
    pub departure: &'static str,
    pub arrival: &'static str,
    pub duration: &'static str,
    /// Whole rupees
    pub price: u32,
    /// 0.0 to 5.0
    pub rating: f32,
    pub tags: &'static [TicketTag],
}

impl TicketOption {
    pub fn has_tag(&self, tag: TicketTag) -> bool {
        self.tags.contains(&tag)
    }
}

pub static TICKET_OPTIONS: [TicketOption; 3] = [
    TicketOption {
        id: "1",
        mode: TransportMode::Train,
        provider: "Shatabdi Express",
        origin: "Chennai",
        destination: "Bangalore",
        departure: "06:00",
        arrival: "11:00",
        duration: "5h 00m",
        price: 985,
        rating: 4.8,
        tags: &[TicketTag::Fastest, TicketTag::Recommended],
    },
    TicketOption {
        id: "2",
        mode: TransportMode::Train,
        provider: "Brindavan Express",
        origin: "Chennai",
        destination: "Bangalore",
        departure: "07:30",
        arrival: "13:15",
        duration: "5h 45m",
        price: 450,
        rating: 4.5,
        tags: &[TicketTag::Cheapest],
    },
    TicketOption {
        id: "3",
        mode: TransportMode::Train,
        provider: "Lalbagh Express",
        origin: "Chennai",
        destination: "Bangalore",
        departure: "14:30",
        arrival: "20:00",
        duration: "5h 30m",
        price: 520,
        rating: 4.6,
        tags: &[],
    },
];

pub fn find_ticket(id: &str) -> Option<&'static TicketOption> {
    TICKET_OPTIONS.iter().find(|t| t.id == id)
}

/// The single service the booking wizard simulates a reservation for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedService {
    pub train: &'static str,
    pub origin: &'static str,
    pub destination: &'static str,
    pub departure: &'static str,
    pub arrival: &'static str,
    pub duration: &'static str,
    pub class: &'static str,
    pub price: u32,
    pub seat: &'static str,
}

pub static FEATURED_SERVICE: FeaturedService = FeaturedService {
    train: "Shatabdi Express (12007)",
    origin: "Chennai Central",
    destination: "Bangalore City Junction",
    departure: "06:00 AM",
    arrival: "11:00 AM",
    duration: "5h 00m",
    class: "AC Chair Car",
    price: 985,
    seat: "A2-24",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ticket() {
        let ticket = find_ticket("2").unwrap();
        assert_eq!(ticket.provider, "Brindavan Express");
        assert!(ticket.has_tag(TicketTag::Cheapest));
        assert!(find_ticket("42").is_none());
    }

    #[test]
    fn test_fixture_invariants() {
        for ticket in &TICKET_OPTIONS {
            assert!((0.0..=5.0).contains(&ticket.rating));
            assert_eq!(ticket.mode, TransportMode::Train);
        }
        let cheapest = TICKET_OPTIONS.iter().min_by_key(|t| t.price).unwrap();
        assert!(cheapest.has_tag(TicketTag::Cheapest));
    }

    #[test]
    fn test_ticket_json_uses_lowercase_enums() {
        let value = serde_json::to_value(TICKET_OPTIONS[0]).unwrap();
        assert_eq!(value["mode"], "train");
        assert_eq!(value["tags"], serde_json::json!(["fastest", "recommended"]));
        assert_eq!(value["price"], 985);
    }
}
