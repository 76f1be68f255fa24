//! Evaluation prompt templates used by the command-line front-ends
//!
//! Two workflows share an aspect/definition pair:
//! - checklist generation: turn key components of an aspect into yes/no sub-questions
//! - report evaluation: answer those questions about a data report

/// Aspect evaluated when none is given
pub const DEFAULT_ASPECT: &str = "Content Completeness";

/// Definition paired with [`DEFAULT_ASPECT`]
pub const DEFAULT_DEFINITION: &str = "refers to the extent to which a report includes all relevant information and addresses all key aspects of the topic without omitting important details. It ensures that the report provides a comprehensive and thorough analysis of the subject matter.";

/// Key components of [`DEFAULT_ASPECT`], one per line
pub const DEFAULT_COMPONENTS: &str = "Data Completeness: Ensure that the report includes all relevant power data without omitting important information.
Analysis Completeness: Assess whether the report provides a comprehensive analysis of all relevant aspects without ignoring important factors.
Conclusion Completeness: Determine whether the conclusions in the report are comprehensive and consider all possible situations and influencing factors";

/// Checklist questions for [`DEFAULT_ASPECT`], one per line
pub const DEFAULT_QUESTIONS: &str = "Does the report include all relevant power data?
Are there any important pieces of power data that are missing from the report?
Has all the power data been clearly presented in the report?
Is there any critical information about power data that has been omitted?";

/// Prompt asking the model to derive yes/no sub-questions from key components
#[must_use]
pub fn checklist_prompt(aspect: &str, definition: &str, components: &str) -> String {
    let mut prompt = format!(
        "In this task, you need to create a question to evaluate the {aspect} of the summary of the original document. \
The definition of {aspect} and the questions corresponding to the key component of {aspect} are provided below. \
Use them to generate sub-questions for each key question.

Each sub-question must satisfy the following conditions:
1. Each question must be answerable with 'Yes' or 'No'.
2. Each question must contain concepts from the key component.
3. Each question should minimize the subjectivity of the rater's judgment.
4. Each question should minimize the semantic redundancy between sub-questions.
5. Formulate questions so that a 'Yes' answer is a positive answer.

# Definition
{aspect} - {definition}

# Key component and corresponding question
"
    );
    push_bullets(&mut prompt, components);
    prompt.push_str("\nSub-questions:");
    prompt
}

/// Prompt asking the model to answer checklist questions about a data report
#[must_use]
pub fn evaluation_prompt(
    aspect: &str,
    definition: &str,
    source: &str,
    report: &str,
    questions: &str,
) -> String {
    let mut prompt = format!(
        "In this task, you will be provided with a 7 days energy data and a data report. \
Your task is to answer 'Yes' or 'No' to the questions related to the {aspect}. \
Do not generate any explanations without answer to the questions.
Please make sure you read and understand these instructions carefully. \
Please keep this document open while reviewing, and refer to it as needed.

Evaluation Criteria:
{aspect} - {definition}

Evaluation Steps:
1. Analyze the summary to evaluate {aspect}.
2. Respond to each of the following questions with either 'Yes' or 'No' to evaluate the {aspect}.
3. Please answer 'Yes' or 'No'. No need to any explain.

7 Days Energy Data: {source}

Data Report: {report}
Questions:
"
    );
    push_bullets(&mut prompt, questions);
    prompt.push_str("\nYour Answers:");
    prompt
}

/// One `- line` bullet per non-blank line of `items`
fn push_bullets(prompt: &mut String, items: &str) {
    for line in items.trim().split('\n') {
        if !line.trim().is_empty() {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
    }
}

/// Prefix a reply with the provider and model that produced it
#[must_use]
pub fn label_reply(provider: &str, model: Option<&str>, reply: &str) -> String {
    format!("[{provider} {}]\n{reply}", model.unwrap_or("default"))
}

/// Strip the label added by [`label_reply`]; empty when there is no label line
#[must_use]
pub fn raw_reply(labelled: &str) -> &str {
    labelled.split_once('\n').map_or("", |(_, raw)| raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_prompt_bullets_components() {
        let prompt = checklist_prompt("Fluency", "reads well", "\n  A: first\n\n   \nB: second\n");
        assert!(prompt.starts_with(
            "In this task, you need to create a question to evaluate the Fluency of the summary"
        ));
        assert!(prompt.contains("# Definition\nFluency - reads well\n"));
        assert!(prompt.ends_with(
            "# Key component and corresponding question\n- A: first\n- B: second\n\nSub-questions:"
        ));
    }

    #[test]
    fn test_evaluation_prompt_layout() {
        let prompt = evaluation_prompt(
            DEFAULT_ASPECT,
            "covers everything",
            "REGIONID,DATAVALUE\nNSW1,9454",
            "Demand rose.",
            DEFAULT_QUESTIONS,
        );
        assert!(prompt.contains("Evaluation Criteria:\nContent Completeness - covers everything\n"));
        assert!(prompt.contains("7 Days Energy Data: REGIONID,DATAVALUE\nNSW1,9454\n"));
        assert!(prompt.contains("Data Report: Demand rose.\nQuestions:\n- Does the report"));
        assert_eq!(prompt.matches("\n- ").count(), 4);
        assert!(prompt.ends_with("omitted?\n\nYour Answers:"));
    }

    #[test]
    fn test_empty_components_yield_no_bullets() {
        let prompt = checklist_prompt("A", "B", "   \n  ");
        assert!(prompt.ends_with("corresponding question\n\nSub-questions:"));
    }

    #[test]
    fn test_label_and_raw_reply() {
        let labelled = label_reply("openai", Some("gpt-4"), "Yes\nNo");
        assert_eq!(labelled, "[openai gpt-4]\nYes\nNo");
        assert_eq!(raw_reply(&labelled), "Yes\nNo");

        assert_eq!(label_reply("gemini", None, "ok"), "[gemini default]\nok");
        assert_eq!(raw_reply("no label here"), "");
    }
}
