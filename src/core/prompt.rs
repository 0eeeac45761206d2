use crate::core::analyzer::{PullRequestContext, ReviewUnit};
use crate::core::language::LanguageInfo;

pub const EMPTY_BODY_PLACEHOLDER: &str = "_No description provided._";

const OUTPUT_TEMPLATE: &str = r#"### 📄 `{file}`

**Summary:** <one sentence describing what this change does>

#### Findings

🔴 **Critical**
- **Line:** <line number or range>
- **Problem:** <what is wrong and why it matters>
- **Suggestion:** <how to fix it>

```{lang}
// optional corrected code
```

🟡 **Warning**
- **Line:** <line number or range>
- **Problem:** <what is wrong and why it matters>
- **Suggestion:** <how to fix it>

🔵 **Suggestion**
- **Line:** <line number or range>
- **Problem:** <what could be better>
- **Suggestion:** <the improvement>

🟢 **Praise**
- **Line:** <line number or range>
- **Problem:** <what was done well>
- **Suggestion:** <none, or how to apply it elsewhere>

#### ✅ Checklist
- [ ] <concrete action item>"#;

const RULES: &[&str] = &[
    "Be concise. One finding per issue, no filler.",
    "Always justify a finding: say why it is a problem, not just that it is one.",
    "Prefer suggestions that are idiomatic for {language}.",
    "Omit any severity section that has no findings, and omit the checklist if there is nothing to do.",
    "Only comment on lines that appear in the diff.",
];

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build_for_unit(pr_context: &PullRequestContext, unit: &ReviewUnit<'_>) -> String {
        Self::build(pr_context, unit.file_name, unit.chunk, &unit.language)
    }

    pub fn build(
        pr_context: &PullRequestContext,
        file_name: &str,
        chunk: &str,
        language: &LanguageInfo,
    ) -> String {
        let mut prompt = String::new();

        let role = if language.is_unknown() {
            "software"
        } else {
            language.display_name
        };
        prompt.push_str(&format!(
            "You are an expert {} engineer acting as a meticulous code reviewer. \
             Review the following pull request change and report concrete, actionable findings.\n\n",
            role
        ));

        prompt.push_str("## Pull Request\n\n");
        prompt.push_str(&format!("**Title:** {}\n\n", pr_context.title));
        let body = if pr_context.body.trim().is_empty() {
            EMPTY_BODY_PLACEHOLDER
        } else {
            pr_context.body.as_str()
        };
        prompt.push_str(&format!("**Description:**\n{}\n\n", body));

        prompt.push_str("## Change\n\n");
        prompt.push_str(&format!("**File:** `{}`\n\n", file_name));
        prompt.push_str("```diff\n");
        prompt.push_str(chunk);
        if !chunk.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str("```\n\n");

        prompt.push_str(&format!("## {} Focus Areas\n\n", language.display_name));
        for area in language.focus_areas {
            prompt.push_str(&format!("- {}\n", area));
        }
        prompt.push('\n');

        prompt.push_str("## Output Format\n\n");
        prompt.push_str("Respond in Markdown using exactly this template:\n\n");
        prompt.push_str(
            &OUTPUT_TEMPLATE
                .replace("{lang}", language.highlight_tag)
                .replace("{file}", file_name),
        );
        prompt.push_str("\n\n");

        prompt.push_str("## Rules\n\n");
        for (i, rule) in RULES.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {}\n",
                i + 1,
                rule.replace("{language}", language.display_name)
            ));
        }

        prompt
    }
}
