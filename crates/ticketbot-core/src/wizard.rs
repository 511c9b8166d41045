//! Linear three-step booking form with a simulated confirmation.

use chrono::Local;

use crate::fixtures::{FeaturedService, FEATURED_SERVICE};

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 6;

/// Shown in place of an empty passenger field on the review step.
pub const NOT_PROVIDED: &str = "Not provided";
/// Shown in the summary when no passenger name was entered.
pub const GUEST_NAME: &str = "Guest User";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    JourneyDetails,
    PassengerInfo,
    ReviewConfirm,
    Complete,
}

impl WizardStep {
    /// The form steps, in order. `Complete` is terminal and not part of the form.
    pub const FORM_STEPS: [WizardStep; 3] = [
        WizardStep::JourneyDetails,
        WizardStep::PassengerInfo,
        WizardStep::ReviewConfirm,
    ];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::JourneyDetails => 0,
            WizardStep::PassengerInfo => 1,
            WizardStep::ReviewConfirm => 2,
            WizardStep::Complete => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::JourneyDetails => "Journey Details",
            WizardStep::PassengerInfo => "Passenger Info",
            WizardStep::ReviewConfirm => "Review & Confirm",
            WizardStep::Complete => "Booking Simulated!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::JourneyDetails => "Enter your journey details",
            WizardStep::PassengerInfo => "Provide passenger information",
            WizardStep::ReviewConfirm => "Review your booking details",
            WizardStep::Complete => "This is a demonstration. No real booking was created.",
        }
    }

    /// Label for the forward action on this step
    pub fn advance_label(&self) -> &'static str {
        match self {
            WizardStep::ReviewConfirm => "Complete Booking",
            WizardStep::Complete => "Start New Booking",
            _ => "Continue",
        }
    }

    /// Editable fields on this step
    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            WizardStep::JourneyDetails => &[
                DraftField::Origin,
                DraftField::Destination,
                DraftField::Date,
                DraftField::Passengers,
            ],
            WizardStep::PassengerInfo => &[DraftField::Name, DraftField::Email, DraftField::Phone],
            WizardStep::ReviewConfirm | WizardStep::Complete => &[],
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::JourneyDetails => WizardStep::PassengerInfo,
            WizardStep::PassengerInfo => WizardStep::ReviewConfirm,
            WizardStep::ReviewConfirm | WizardStep::Complete => WizardStep::Complete,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::JourneyDetails | WizardStep::PassengerInfo => WizardStep::JourneyDetails,
            WizardStep::ReviewConfirm => WizardStep::PassengerInfo,
            WizardStep::Complete => WizardStep::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Origin,
    Destination,
    Date,
    Passengers,
    Name,
    Email,
    Phone,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Origin => "From",
            DraftField::Destination => "To",
            DraftField::Date => "Travel Date",
            DraftField::Passengers => "Passengers",
            DraftField::Name => "Full Name",
            DraftField::Email => "Email",
            DraftField::Phone => "Phone Number",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            DraftField::Origin => "Departure city",
            DraftField::Destination => "Destination city",
            DraftField::Date => "YYYY-MM-DD",
            DraftField::Passengers => "1-6",
            DraftField::Name => "Enter passenger name",
            DraftField::Email => "your@email.com",
            DraftField::Phone => "+91 XXXXX XXXXX",
        }
    }
}

/// In-progress form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub origin: String,
    pub destination: String,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    pub passengers: u8,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            origin: "Chennai".to_string(),
            destination: "Bangalore".to_string(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            passengers: MIN_PASSENGERS,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl BookingDraft {
    pub fn value(&self, field: DraftField) -> String {
        match field {
            DraftField::Origin => self.origin.clone(),
            DraftField::Destination => self.destination.clone(),
            DraftField::Date => self.date.clone(),
            DraftField::Passengers => self.passengers.to_string(),
            DraftField::Name => self.name.clone(),
            DraftField::Email => self.email.clone(),
            DraftField::Phone => self.phone.clone(),
        }
    }

    /// Replace one field. Passenger counts are clamped to the allowed range;
    /// input that isn't a number leaves the count as it was.
    pub fn set(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Origin => self.origin = value.to_string(),
            DraftField::Destination => self.destination = value.to_string(),
            DraftField::Date => self.date = value.to_string(),
            DraftField::Passengers => {
                if let Ok(count) = value.trim().parse::<i64>() {
                    self.passengers = count.clamp(MIN_PASSENGERS as i64, MAX_PASSENGERS as i64) as u8;
                }
            }
            DraftField::Name => self.name = value.to_string(),
            DraftField::Email => self.email = value.to_string(),
            DraftField::Phone => self.phone = value.to_string(),
        }
    }

    /// Value as shown on the review step
    pub fn review_value(&self, field: DraftField) -> String {
        let value = self.value(field);
        if value.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            value
        }
    }
}

/// What the confirmation screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub service: FeaturedService,
    pub date: String,
    pub passenger_name: String,
    pub passengers: u8,
    pub total: u32,
}

impl BookingSummary {
    fn from_draft(service: FeaturedService, draft: &BookingDraft) -> Self {
        let passenger_name = if draft.name.is_empty() {
            GUEST_NAME.to_string()
        } else {
            draft.name.clone()
        };

        Self {
            service,
            date: draft.date.clone(),
            passenger_name,
            passengers: draft.passengers,
            total: service.price * draft.passengers as u32,
        }
    }
}

/// Result of pressing the forward button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(WizardStep),
    Completed(BookingSummary),
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    draft: BookingDraft,
    service: FeaturedService,
    summary: Option<BookingSummary>,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new(FEATURED_SERVICE)
    }
}

impl BookingWizard {
    pub fn new(service: FeaturedService) -> Self {
        Self {
            step: WizardStep::JourneyDetails,
            draft: BookingDraft::default(),
            service,
            summary: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn service(&self) -> &FeaturedService {
        &self.service
    }

    pub fn summary(&self) -> Option<&BookingSummary> {
        self.summary.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Complete
    }

    /// Running total shown beside the form
    pub fn total(&self) -> u32 {
        self.service.price * self.draft.passengers as u32
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_complete() {
            return Advance::Unchanged;
        }

        self.step = self.step.next();
        tracing::debug!(step = ?self.step, "wizard advanced");

        if self.is_complete() {
            let summary = BookingSummary::from_draft(self.service, &self.draft);
            tracing::info!(total = summary.total, passengers = summary.passengers, "booking simulated");
            self.summary = Some(summary.clone());
            Advance::Completed(summary)
        } else {
            Advance::Moved(self.step)
        }
    }

    pub fn retreat(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    pub fn update_field(&mut self, field: DraftField, value: &str) -> &BookingDraft {
        if !self.is_complete() {
            self.draft.set(field, value);
        }
        &self.draft
    }

    pub fn restart(&mut self) {
        self.step = WizardStep::JourneyDetails;
        self.draft = BookingDraft::default();
        self.summary = None;
    }
}
