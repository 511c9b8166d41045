//! Prompt playground: try prompts against the assistant with custom instructions.

use crate::error::{AgentError, Result};

pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are an intelligent ticket booking assistant. Your role is to:
1. Understand user's travel or event requirements
2. Ask clarifying questions if needed
3. Provide relevant options with prices and timings
4. Guide users through the booking process
5. Offer helpful tips and recommendations

Be friendly, professional, and concise in your responses.";

pub const RUN_FAILED_NOTICE: &str = "Failed to generate response.";
const VERBOSE_INSTRUCTION: &str = "\n\nProvide verbose, detailed responses.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePrompt {
    pub title: &'static str,
    pub prompt: &'static str,
    pub description: &'static str,
}

pub static EXAMPLE_PROMPTS: [ExamplePrompt; 4] = [
    ExamplePrompt {
        title: "Train Booking",
        prompt: "Book a train ticket from Chennai to Bangalore tomorrow",
        description: "Simple train booking query",
    },
    ExamplePrompt {
        title: "Budget Flight",
        prompt: "Find the cheapest flight from Delhi to Mumbai this weekend",
        description: "Budget-focused search",
    },
    ExamplePrompt {
        title: "Bus Compare",
        prompt: "Compare overnight bus options from Hyderabad to Goa",
        description: "Multi-option comparison",
    },
    ExamplePrompt {
        title: "Event Tickets",
        prompt: "Get tickets for the upcoming IPL match in Chennai",
        description: "Event booking query",
    },
];

/// Arguments for one playground run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaygroundRequest {
    pub prompt: String,
    pub instructions: String,
}

#[derive(Debug, Clone)]
pub struct Playground {
    pub prompt: String,
    pub instructions: String,
    pub verbose: bool,
    response: Option<String>,
    running: bool,
    default_instructions: String,
}

impl Default for Playground {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_INSTRUCTIONS)
    }
}

impl Playground {
    pub fn new(default_instructions: &str) -> Self {
        Self {
            prompt: String::new(),
            instructions: default_instructions.to_string(),
            verbose: false,
            response: None,
            running: false,
            default_instructions: default_instructions.to_string(),
        }
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn load_example(&mut self, index: usize) {
        if let Some(example) = EXAMPLE_PROMPTS.get(index) {
            self.prompt = example.prompt.to_string();
        }
    }

    /// Validate the prompt and build the request. Clears the previous response.
    pub fn prepare(&mut self) -> Result<PlaygroundRequest> {
        if self.prompt.trim().is_empty() {
            return Err(AgentError::EmptyPrompt);
        }
        if self.running {
            return Err(AgentError::Busy);
        }

        let mut instructions = self.instructions.clone();
        if self.verbose {
            instructions.push_str(VERBOSE_INSTRUCTION);
        }

        self.response = None;
        self.running = true;
        Ok(PlaygroundRequest {
            prompt: self.prompt.clone(),
            instructions,
        })
    }

    /// Store the result of a run. Returns a notice to show if it failed.
    pub fn finish(&mut self, result: Result<String>) -> Option<&'static str> {
        self.running = false;
        match result {
            Ok(response) => {
                self.response = Some(response);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "playground run failed");
                Some(RUN_FAILED_NOTICE)
            }
        }
    }

    pub fn reset(&mut self) {
        self.prompt.clear();
        self.instructions = self.default_instructions.clone();
        self.verbose = false;
        self.response = None;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{compose_reply, VERBOSE_SUFFIX};

    #[test]
    fn test_blank_prompt_rejected() {
        let mut playground = Playground::default();
        playground.prompt = "  \n".to_string();
        assert!(matches!(playground.prepare(), Err(AgentError::EmptyPrompt)));
        assert!(!playground.is_running());
    }

    #[test]
    fn test_verbose_flag_reaches_reply() {
        let mut playground = Playground::default();
        playground.load_example(2);
        playground.verbose = true;

        let request = playground.prepare().unwrap();
        assert!(request.instructions.ends_with(VERBOSE_INSTRUCTION));
        let reply = compose_reply(&request.prompt, Some(&request.instructions));
        assert!(reply.ends_with(VERBOSE_SUFFIX));

        assert!(playground.finish(Ok(reply)).is_none());
        assert!(playground.response().is_some());
    }

    #[test]
    fn test_default_instructions_are_not_verbose() {
        let mut playground = Playground::default();
        playground.prompt = "bus".to_string();
        let request = playground.prepare().unwrap();
        let reply = compose_reply(&request.prompt, Some(&request.instructions));
        assert!(!reply.ends_with(VERBOSE_SUFFIX));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut playground = Playground::new("be brief");
        playground.prompt = "train".to_string();
        playground.instructions = "be verbose".to_string();
        playground.verbose = true;
        playground.prepare().unwrap();
        playground.finish(Ok("done".to_string()));

        playground.reset();
        assert!(playground.prompt.is_empty());
        assert_eq!(playground.instructions, "be brief");
        assert!(!playground.verbose);
        assert!(playground.response().is_none());
    }
}
