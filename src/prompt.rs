use crate::registry::BrandRegistry;

/// Default instruction template. `{brands}` receives the comma-joined
/// registry and `{payload}` the CSV block being corrected.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are a brand name correction assistant. I will give you the contents of a spreadsheet that contains marketing brief information. The text may include misspelled brand names, and your job is to act like a brand name spellchecker.

Your task is to:
- Read the text exactly as it appears in the cells.
- Identify any brand names mentioned, even if they are misspelled.
- Correct the brand names to their proper spelling, based on the known list below.
- Return the corrected content in CSV format with the same shape, row and column order preserved.

Important:
- Do not rephrase or summarise anything.
- Only correct brand names.
- Preserve line breaks, punctuation, and all non-brand content exactly as it was.
- If no brand name is misspelled, return the text unchanged.

Known correct brand names:
{brands}

Here is the CSV content. Return only the CSV, nothing else:
```
{payload}
```"#;

/// Formats correction prompts from a fixed template.
///
/// The payload is substituted verbatim, with no escaping: payload text that
/// itself contains a fence marker can confuse downstream normalization.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn build(&self, registry: &BrandRegistry, payload: &str) -> String {
        self.template
            .replace("{brands}", &registry.joined())
            .replace("{payload}", payload)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_TEMPLATE)
    }
}
