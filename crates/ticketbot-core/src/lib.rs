pub mod config;
pub mod error;
pub mod fixtures;
pub mod playground;
pub mod resolver;
pub mod session;
pub mod state;
pub mod wizard;

// Re-export main types for convenience
pub use config::Config;
pub use error::{AgentError, Result};
pub use fixtures::{FeaturedService, TicketOption, TicketTag, TransportMode, FEATURED_SERVICE, TICKET_OPTIONS};
pub use playground::{ExamplePrompt, Playground, PlaygroundRequest, EXAMPLE_PROMPTS};
pub use resolver::{compose_reply, Latency, MockAssistant, ReplyCategory, ReplyTask};
pub use session::{ChatSession, PendingReply, QuickAction, ReplyOutcome};
pub use state::{ChatMessage, ChatRole};
pub use wizard::{Advance, BookingDraft, BookingSummary, BookingWizard, DraftField, WizardStep};
