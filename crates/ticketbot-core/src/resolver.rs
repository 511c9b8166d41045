//! Keyword-matched canned replies that stand in for a language model.
//!
//! [`MockAssistant::reply`] keeps the shape a real model client would have
//! (text in, text out, fallible, latency-bounded) so a networked provider
//! could replace it without touching callers.

use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use crate::error::{AgentError, Result};

/// Instructions containing this token get [`VERBOSE_SUFFIX`] appended to the reply.
pub const VERBOSE_MARKER: &str = "verbose";
pub const VERBOSE_SUFFIX: &str = "\n\n---\n*[Verbose mode enabled - showing detailed response]*";

pub const GREETING_TEXT: &str = "Hello! I'm your AI Ticket Booking Assistant. 🎫

I can help you with:
• **Train tickets** - Find the best routes and classes
• **Bus bookings** - Compare operators and prices
• **Flight reservations** - Search across airlines
• **Event tickets** - Concerts, sports, and more
• **Movie tickets** - Book seats at your favorite theaters

Just tell me what you're looking for, and I'll guide you through the booking process step by step!

**Example:** \"I want to book a train from Chennai to Bangalore tomorrow\"";

const TRAIN_TEXT: &str = "I'd be happy to help you book a train ticket! 🚆

To find the best options, I'll need a few details:
1. **From:** Which city are you departing from?
2. **To:** Where would you like to go?
3. **Date:** When do you want to travel?
4. **Class:** Do you prefer Sleeper, AC, or General?

Once you provide these details, I'll show you the best available trains with prices and timings!";

const BUS_TEXT: &str = "Great choice! Bus travel is often the most economical option. 🚌

Please share:
1. **Source city**
2. **Destination city**
3. **Travel date**
4. **Preference:** AC/Non-AC, Sleeper/Seater?

I'll find you the best routes with comfort and price comparisons!";

const FLIGHT_TEXT: &str = "Let's find you the perfect flight! ✈️

I'll need to know:
1. **From:** Departure airport/city
2. **To:** Destination airport/city
3. **Date:** Travel date (one-way or round-trip?)
4. **Class:** Economy, Premium Economy, or Business?
5. **Budget:** Any price range in mind?

I'll search across airlines to get you the best deals!";

const ROUTE_TEXT: &str = "Perfect! I found several options for your Chennai → Bangalore journey. 🎯

**Best Options Available:**

1. **🏆 Shatabdi Express** (Fastest & Recommended)
   - Departure: 06:00 AM → Arrival: 11:00 AM
   - Duration: 5 hours | Price: ₹985
   - Rating: ⭐ 4.8/5

2. **💰 Brindavan Express** (Cheapest)
   - Departure: 07:30 AM → Arrival: 01:15 PM
   - Duration: 5h 45m | Price: ₹450
   - Rating: ⭐ 4.5/5

3. **Lalbagh Express**
   - Departure: 02:30 PM → Arrival: 08:00 PM
   - Duration: 5h 30m | Price: ₹520
   - Rating: ⭐ 4.6/5

**My Recommendation:** Shatabdi Express offers the best comfort-to-time ratio with premium AC coaches and complimentary meals.

Would you like me to proceed with booking any of these options?";

const BOOKING_TEXT: &str = "Excellent choice! 🎉

Here's a summary of your booking:

📍 **Route:** Chennai Central → Bangalore City Junction
🚆 **Train:** Shatabdi Express (12007)
📅 **Date:** Tomorrow
💺 **Class:** AC Chair Car
💰 **Price:** ₹985 per person

**⚠️ Simulation Mode:** This is a demo booking preview.

To complete a real booking, you would:
1. Select your seats from the available layout
2. Enter passenger details (Name, Age, ID proof)
3. Review the total amount
4. Proceed to secure payment

**Pro Tips:**
• Book early morning trains for better punctuality
• Carry a valid photo ID matching your ticket
• Arrive 30 minutes before departure

Would you like me to simulate the seat selection step?";

const BUDGET_TEXT: &str = "Looking for budget-friendly options! 💰

Here are my recommendations:

**🚌 Bus (Most Economical)**
- Non-AC Sleeper buses start from ₹350
- Travel time: 6-7 hours
- Overnight options available

**🚆 Train (Best Value)**
- Brindavan Express: ₹450 (Second Sitting)
- Lalbagh Express: ₹520 (Second Sitting)
- Travel time: 5-6 hours

**Pro Tips for Saving Money:**
1. Book 2-3 days in advance for best prices
2. Consider non-AC options for short routes
3. Check for Tatkal availability (extra ₹100-200)
4. Overnight buses save hotel costs

Which option would you like to explore?";

/// A family of canned replies, chosen by keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCategory {
    Route,
    Train,
    Bus,
    Flight,
    Booking,
    Budget,
    Greeting,
}

impl ReplyCategory {
    /// Match order. The first category whose keywords match wins; `Greeting`
    /// is the fallback and never matches on its own.
    pub const PRIORITY: [ReplyCategory; 6] = [
        ReplyCategory::Route,
        ReplyCategory::Train,
        ReplyCategory::Bus,
        ReplyCategory::Flight,
        ReplyCategory::Booking,
        ReplyCategory::Budget,
    ];

    /// Pick the category for a piece of user text.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|category| category.matches(&lowered))
            .unwrap_or(ReplyCategory::Greeting)
    }

    /// `lowered` must already be lower-case.
    fn matches(&self, lowered: &str) -> bool {
        match self {
            ReplyCategory::Route => lowered.contains("chennai") && lowered.contains("bangalore"),
            ReplyCategory::Train => lowered.contains("train"),
            ReplyCategory::Bus => lowered.contains("bus"),
            ReplyCategory::Flight => lowered.contains("flight"),
            ReplyCategory::Booking => lowered.contains("book") || lowered.contains("select"),
            ReplyCategory::Budget => lowered.contains("cheapest") || lowered.contains("budget"),
            ReplyCategory::Greeting => false,
        }
    }

    pub fn canned_text(&self) -> &'static str {
        match self {
            ReplyCategory::Route => ROUTE_TEXT,
            ReplyCategory::Train => TRAIN_TEXT,
            ReplyCategory::Bus => BUS_TEXT,
            ReplyCategory::Flight => FLIGHT_TEXT,
            ReplyCategory::Booking => BOOKING_TEXT,
            ReplyCategory::Budget => BUDGET_TEXT,
            ReplyCategory::Greeting => GREETING_TEXT,
        }
    }
}

/// Select the reply text for `prompt` without any delay.
pub fn compose_reply(prompt: &str, instructions: Option<&str>) -> String {
    let category = ReplyCategory::classify(prompt);
    tracing::debug!(?category, "matched reply category");

    let mut reply = category.canned_text().to_string();
    if instructions.is_some_and(|i| i.contains(VERBOSE_MARKER)) {
        reply.push_str(VERBOSE_SUFFIX);
    }
    reply
}

/// Artificial response delay: `min` plus a uniformly random share of `jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub min: Duration,
    pub jitter: Duration,
}

impl Latency {
    pub const NONE: Latency = Latency {
        min: Duration::ZERO,
        jitter: Duration::ZERO,
    };

    pub fn from_millis(min_ms: u64, jitter_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            jitter: Duration::from_millis(jitter_ms),
        }
    }

    /// Draw a delay in `[min, min + jitter)`.
    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.min;
        }
        self.min + Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(1000, 1000)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockAssistant {
    latency: Latency,
}

impl MockAssistant {
    pub fn new(latency: Latency) -> Self {
        Self { latency }
    }

    pub async fn reply(&self, prompt: &str, instructions: Option<&str>) -> Result<String> {
        let reply = compose_reply(prompt, instructions);
        let delay = self.latency.sample();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "simulating model latency");
            tokio::time::sleep(delay).await;
        }
        Ok(reply)
    }

    /// Run [`reply`](Self::reply) on a background task.
    pub fn spawn_reply(&self, prompt: String, instructions: Option<String>) -> ReplyTask {
        let assistant = self.clone();
        let handle = tokio::spawn(async move { assistant.reply(&prompt, instructions.as_deref()).await });
        ReplyTask { handle }
    }
}

/// Handle to a reply being produced in the background.
///
/// Dropping the handle aborts the task, so a reply is never delivered to a
/// consumer that has gone away.
pub struct ReplyTask {
    handle: JoinHandle<Result<String>>,
}

impl ReplyTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    pub async fn join(mut self) -> Result<String> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(AgentError::Cancelled),
            Err(e) => Err(AgentError::TaskFailed(e.to_string())),
        }
    }
}

impl Drop for ReplyTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_keyword_any_case() {
        assert_eq!(compose_reply("I need a TRAIN to Mysore", None), TRAIN_TEXT);
        assert_eq!(compose_reply("Train please", None), TRAIN_TEXT);
    }

    #[test]
    fn test_route_beats_single_keywords() {
        for prompt in [
            "Book a train ticket from Chennai to Bangalore tomorrow",
            "bus from chennai to bangalore",
            "cheapest flight CHENNAI bangalore",
        ] {
            assert_eq!(ReplyCategory::classify(prompt), ReplyCategory::Route, "{prompt}");
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(ReplyCategory::classify("train or bus?"), ReplyCategory::Train);
        assert_eq!(ReplyCategory::classify("bus or flight?"), ReplyCategory::Bus);
        assert_eq!(ReplyCategory::classify("book a flight"), ReplyCategory::Flight);
        assert_eq!(ReplyCategory::classify("I want to book the cheapest"), ReplyCategory::Booking);
        assert_eq!(ReplyCategory::classify("select one"), ReplyCategory::Booking);
        assert_eq!(ReplyCategory::classify("on a budget"), ReplyCategory::Budget);
        assert_eq!(ReplyCategory::classify("only chennai"), ReplyCategory::Greeting);
    }

    #[test]
    fn test_default_greeting() {
        assert_eq!(compose_reply("hello there", None), GREETING_TEXT);
        assert_eq!(compose_reply("", None), GREETING_TEXT);
    }

    #[test]
    fn test_verbose_suffix() {
        let reply = compose_reply("bus", Some("Be verbose please"));
        assert_eq!(reply, format!("{BUS_TEXT}{VERBOSE_SUFFIX}"));

        let plain = compose_reply("bus", Some("Be concise"));
        assert_eq!(plain, BUS_TEXT);
    }

    #[test]
    fn test_latency_sample_bounds() {
        let latency = Latency::from_millis(1000, 1000);
        for _ in 0..100 {
            let d = latency.sample();
            assert!(d >= Duration::from_millis(1000));
            assert!(d < Duration::from_millis(2000));
        }
        assert_eq!(Latency::NONE.sample(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_is_delayed_and_stable() {
        let assistant = MockAssistant::default();
        let start = tokio::time::Instant::now();
        let first = assistant.reply("flight to Delhi", None).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));

        let second = assistant.reply("flight to Delhi", None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, FLIGHT_TEXT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_reply_completes() {
        let assistant = MockAssistant::default();
        let task = assistant.spawn_reply("budget trip".to_string(), None);
        let reply = task.join().await.unwrap();
        assert_eq!(reply, BUDGET_TEXT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_reply_is_cancelled() {
        let assistant = MockAssistant::default();
        let task = assistant.spawn_reply("train".to_string(), None);
        task.abort();
        assert!(matches!(task.join().await, Err(AgentError::Cancelled)));
    }
}
