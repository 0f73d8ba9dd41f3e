use super::types::ConversationContext;

/// Fixed behavioral instruction set for the reasoning backend.
///
/// Asks for a strict machine-readable block first (so the structured
/// fields never have to be scraped out of prose) followed by the
/// patient-facing reply.
pub const SYSTEM_PROMPT: &str = r#"You are a medical symptom analyzer. Your goal is to understand the user's health condition like a real doctor would. When the user describes their symptoms:

1. Ask 2-3 clear and relevant follow-up questions based on the symptoms.
   - These should help narrow down the possible condition.
   - Example: "How high is your fever?", "Do you have any rashes?", "Are you pregnant?"

2. After asking follow-up questions, wait for the user to answer.

3. Once you have enough detail:
   - Give your best guess of the disease (ONLY if you are at least 95% confident)
   - Mention the severity: exactly one of Mild, Moderate, Severe, Emergency
   - Give simple recommendations (e.g. take rest, drink water, visit a doctor)

4. Always end your reply by asking:
   - "Would you like to add more symptoms or details for better accuracy?"

Only respond based on real medical reasoning. Do not guess or provide fake answers.

OUTPUT FORMAT (follow it exactly):
Start with a fenced JSON block:

```json
{
  "condition": "<disease name, or null unless you are at least 95% confident>",
  "severity": "<Mild|Moderate|Severe|Emergency, or null unless confident>",
  "risk_level": "<low|medium|high>",
  "recommendations": ["<plain-language recommendation>", "..."],
  "confidence_met": <true only when you are at least 95% confident>
}
```

After the block, write your reply to the user in plain language (your
follow-up questions, or your conclusion and recommendations)."#;

/// Render the rolling context into the user message for the backend.
///
/// With history, prior user and assistant turns become two labeled
/// blocks ahead of the current message; a one-shot context is sent as
/// the bare symptom text.
pub fn render_context(context: &ConversationContext) -> String {
    if !context.has_history() {
        return context.current.clone();
    }

    let mut prompt = String::new();
    prompt.push_str("Previous conversation:\nUser:\n");
    prompt.push_str(&context.prior_user.join("\n"));
    prompt.push_str("\nAssistant:\n");
    prompt.push_str(&context.prior_assistant.join("\n"));
    prompt.push_str("\n\nCurrent message: ");
    prompt.push_str(&context.current);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_the_instruction_set() {
        assert!(SYSTEM_PROMPT.contains("2-3 clear and relevant follow-up questions"));
        assert!(SYSTEM_PROMPT.contains("95% confident"));
        assert!(SYSTEM_PROMPT.contains("Mild, Moderate, Severe, Emergency"));
        assert!(SYSTEM_PROMPT.contains("Would you like to add more symptoms"));
        assert!(SYSTEM_PROMPT.contains("```json"));
    }

    #[test]
    fn single_context_renders_bare_text() {
        let prompt = render_context(&ConversationContext::single("fever and cough"));
        assert_eq!(prompt, "fever and cough");
    }

    #[test]
    fn history_renders_labeled_blocks() {
        let context = ConversationContext {
            prior_user: vec!["I have a fever".into(), "It is 39C".into()],
            prior_assistant: vec!["How high is your fever?".into()],
            current: "Also a sore throat".into(),
        };
        let prompt = render_context(&context);
        assert!(prompt.starts_with("Previous conversation:\nUser:\n"));
        assert!(prompt.contains("I have a fever\nIt is 39C"));
        assert!(prompt.contains("Assistant:\nHow high is your fever?"));
        assert!(prompt.ends_with("Current message: Also a sore throat"));
    }
}
