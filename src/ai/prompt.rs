//! 评审提示词构建与模型输出解析

use std::fmt::Write;

use serde_json::Value;

use super::{AiAssistInput, AiAssistOutput};
use crate::errors::{HackHubError, Result};

// 单个提交正文写入提示词的上限
const MAX_CONTENT_CHARS: usize = 4000;

pub fn build_system_prompt(locale: &str) -> String {
    format!(
        r#"You are an experienced hackathon judge. Evaluate the team's deliverables against the rubric and output ONLY valid JSON.

Schema:
{{"comment": "string", "score": number or null, "evaluated_submission_ids": [number] or null}}

Rules:
1. Write the comment in locale "{locale}".
2. The score must lie within the rubric scale; use null if the deliverables cannot be judged.
3. evaluated_submission_ids may only contain ids listed in the input.
4. Return ONLY the JSON object, no explanations."#
    )
}

pub fn build_user_prompt(input: &AiAssistInput) -> String {
    let rubric = &input.rubric;
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Target: {}", input.target.target_key());
    let _ = writeln!(
        prompt,
        "Rubric: {} (scale {} - {})",
        rubric.name, rubric.scale_min, rubric.scale_max
    );
    if let Some(guidance) = rubric.guidance.as_deref().filter(|g| !g.trim().is_empty()) {
        let _ = writeln!(prompt, "Guidance: {guidance}");
    }
    for criterion in &rubric.criteria {
        let (_, upper) = criterion.bounds(rubric.scale_min, rubric.scale_max);
        let _ = writeln!(
            prompt,
            "- Criterion #{} \"{}\" weight {} max {}",
            criterion.criterion_id, criterion.title, criterion.weight, upper
        );
    }

    prompt.push_str("\nSubmissions:\n");
    if input.submissions.is_empty() {
        prompt.push_str("(none)\n");
    }
    for submission in &input.submissions {
        let content = submission.content.as_deref().unwrap_or("");
        let _ = writeln!(
            prompt,
            "--- submission id={} task={} status={} ---\n{}",
            submission.id,
            submission.task_id,
            submission.status,
            truncate_chars(content, MAX_CONTENT_CHARS)
        );
    }

    prompt
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// 去掉 ``` 代码块包裹，再截取最外层的 JSON 对象
fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            rest.strip_suffix("```").unwrap_or(rest)
        }
        None => trimmed,
    };

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (start < end).then(|| &unfenced[start..=end])
}

fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// 宽松解析模型输出：容忍代码块、字符串形式的数字与缺失字段
pub fn parse_oracle_output(raw: &str) -> Result<AiAssistOutput> {
    let json = extract_json_object(raw).ok_or_else(|| {
        HackHubError::adapter_unavailable("AI 输出中没有 JSON 对象")
    })?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| HackHubError::adapter_unavailable(format!("AI 输出不是合法 JSON: {e}")))?;

    let comment = value
        .get("comment")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let score = value.get("score").and_then(lenient_number);
    let evaluated_submission_ids = value
        .get("evaluated_submission_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect::<Vec<_>>());

    if comment.is_empty() && score.is_none() {
        return Err(HackHubError::adapter_unavailable(
            "AI 输出既没有评语也没有分数",
        ));
    }

    Ok(AiAssistOutput {
        comment,
        score,
        evaluated_submission_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::EvaluationTarget;
    use crate::models::rubrics::entities::{CriterionSnapshot, RubricSnapshot};
    use crate::models::submissions::entities::{Submission, SubmissionStatus, SubmissionType};

    #[test]
    fn test_parse_plain_json() {
        let out = parse_oracle_output(r#"{"comment":"Solid demo","score":8.5}"#).unwrap();
        assert_eq!(out.comment, "Solid demo");
        assert_eq!(out.score, Some(8.5));
        assert_eq!(out.evaluated_submission_ids, None);
    }

    #[test]
    fn test_parse_fenced_json_with_string_score() {
        let raw = "```json\n{\"comment\": \"ok\", \"score\": \"72\", \"evaluated_submission_ids\": [3, 4]}\n```";
        let out = parse_oracle_output(raw).unwrap();
        assert_eq!(out.score, Some(72.0));
        assert_eq!(out.evaluated_submission_ids, Some(vec![3, 4]));
    }

    #[test]
    fn test_parse_json_with_leading_chatter() {
        let raw = "Here is my evaluation: {\"comment\": \"fine\", \"score\": null}";
        let out = parse_oracle_output(raw).unwrap();
        assert_eq!(out.comment, "fine");
        assert_eq!(out.score, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_oracle_output("I cannot evaluate this").unwrap_err();
        assert!(err.is_retryable());
        let err = parse_oracle_output(r#"{"comment": ""}"#).unwrap_err();
        assert!(matches!(err, HackHubError::AdapterUnavailable(_)));
    }

    #[test]
    fn test_user_prompt_lists_rubric_and_submissions() {
        let now = chrono::Utc::now();
        let input = AiAssistInput {
            target: EvaluationTarget::Phase {
                phase_id: 2,
                team_id: 9,
            },
            rubric: RubricSnapshot {
                rubric_id: 1,
                name: "Demo Day".into(),
                scale_min: 0.0,
                scale_max: 100.0,
                guidance: Some("Focus on impact".into()),
                criteria: vec![CriterionSnapshot {
                    criterion_id: 5,
                    title: "Impact".into(),
                    weight: 2.0,
                    max_score: Some(10.0),
                    order_index: 1,
                }],
                taken_at: now,
            },
            submissions: vec![Submission {
                id: 42,
                task_id: 7,
                team_id: 9,
                author_id: 1,
                status: SubmissionStatus::Final,
                submission_type: SubmissionType::Final,
                content: Some("x".repeat(MAX_CONTENT_CHARS + 10)),
                submitted_at: now,
                updated_at: now,
            }],
            locale: "en".into(),
        };

        let prompt = build_user_prompt(&input);
        assert!(prompt.contains("Target: phase:2:team:9"));
        assert!(prompt.contains("Guidance: Focus on impact"));
        assert!(prompt.contains("Criterion #5 \"Impact\" weight 2 max 10"));
        assert!(prompt.contains("submission id=42 task=7 status=final"));
        assert!(!prompt.contains(&"x".repeat(MAX_CONTENT_CHARS + 1)));
    }
}
