//! Instruction prompt sent with every routed message

/// Fixed instructions that decide whether a message becomes a tool call
pub const INSTRUCTION_PROMPT: &str = r#"You are a flashcard assistant.

Follow these rules exactly:
- If the user asks to add, create, save, remember or make a flashcard, or gives a front and a back, call the tool "addFlashcardTool" exactly once.
- If the user asks to be quizzed, tested, to practice or to review, call the tool "quizUserTool" exactly once.
- For anything else, do not call any tool and answer normally.

When calling a tool:
- Never ask the user a follow-up or clarifying question.
- Never add fields other than the ones the tool declares.
- For addFlashcardTool, pass "front" and "back" as plain strings.
- If the user wants a flashcard but only names a topic, infer one simple, beginner-level card about that topic yourself. One card only, short and clear.
- For quizUserTool, pass no arguments.

Example of the expected format only. Do not reuse it unless the user's topic is exactly the same; the card must match the user's topic.

Example topic: "basic N5 Japanese grammar"
Example addFlashcardTool arguments:
front: "N5 grammar: How do you say 'I am a student' in Japanese?"
back: "わたしはがくせいです。 (watashi wa gakusei desu). Pattern: A は B です (A wa B desu)."
"#;

/// Full prompt for one message: instructions, then the user's text
pub fn build_prompt(message: &str) -> String {
    format!("{}\nUser message: {}", INSTRUCTION_PROMPT, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_appends_message() {
        let prompt = build_prompt("Quiz me");
        assert!(prompt.starts_with(INSTRUCTION_PROMPT));
        assert!(prompt.ends_with("\nUser message: Quiz me"));
    }

    #[test]
    fn test_prompt_names_both_tools() {
        assert!(INSTRUCTION_PROMPT.contains("addFlashcardTool"));
        assert!(INSTRUCTION_PROMPT.contains("quizUserTool"));
    }

    #[test]
    fn test_message_is_not_interpreted() {
        let prompt = build_prompt("{front} {{back}}");
        assert!(prompt.ends_with("User message: {front} {{back}}"));
    }
}
