//! Keyword-routed engine that needs no hosted model
//!
//! Picks at most one tool from the wording of the message, pulls the tool's
//! arguments out with regexes, and asks for whatever is missing.

use super::{AgentContext, AgentError, Answer, ReasoningEngine};
use crate::health::{assess_stress, StressLevel, ENERGY_BANDS, STRESS_KEYWORDS};
use crate::tools::{ToolInvocation, ToolRegistry};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static WEIGHT_KG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:kg|kgs|kilos?|kilograms?)\b").expect("valid regex")
});

static HEIGHT_CM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:cm|cms|centimet(?:er|re)s?)\b").expect("valid regex")
});

static AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*-?\s*(?:years?|yrs?)\b|\baged?\s*(?:is\s+|of\s+|:\s*)?(\d{1,3})\b")
        .expect("valid regex")
});

static SEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(male|man|boy|guy|female|woman|girl|lady)\b").expect("valid regex")
});

static ACTIVITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(very[\s_-]active|sedentary|light|moderate|active)\b").expect("valid regex")
});

static ENERGY: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<&str> = ENERGY_BANDS.iter().map(|(word, _)| *word).collect();
    Regex::new(&format!(r"(?i)\b({})\b", words.join("|"))).expect("valid regex")
});

const HELP_TEXT: &str = "Hello! I'm your AI Health & Mental Wellbeing Agent. I can calculate your BMI, estimate your daily calorie needs, check in on your stress level and suggest wellness activities for your energy level. For example, ask \"I weigh 70 kg and I'm 175 cm tall, what's my BMI?\"";

const BMI_QUESTION: &str = "To calculate your BMI I need your weight in kilograms and your height in centimeters, for example \"I weigh 70 kg and I'm 175 cm tall\".";

const ENERGY_QUESTION: &str = "How is your energy right now? Tell me if it feels low, okay or high and I'll suggest some activities.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Bmi,
    Calories,
    Activities,
    Stress,
    Help,
}

impl Intent {
    fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let mentions_bmi = lowered
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "bmi");
        if mentions_bmi || lowered.contains("body mass") {
            Self::Bmi
        } else if lowered.contains("calor") {
            Self::Calories
        } else if lowered.contains("activit") || lowered.contains("suggest") {
            Self::Activities
        } else if lowered.contains("stress")
            || STRESS_KEYWORDS.iter().any(|k| lowered.contains(k))
        {
            Self::Stress
        } else {
            Self::Help
        }
    }
}

/// Deterministic engine over the shared tool registry
pub struct RuleEngine {
    tools: Arc<ToolRegistry>,
}

impl RuleEngine {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    async fn call(&self, tool: &str, raw_input: &str) -> Option<ToolInvocation> {
        let invocation = self.tools.invoke(tool, raw_input).await;
        if invocation.is_none() {
            tracing::warn!(tool, "Rule engine tool is not registered");
        }
        invocation
    }

    async fn bmi(&self, message: &str) -> Answer {
        let (Some(weight), Some(height)) = (capture(&WEIGHT_KG, message), capture(&HEIGHT_CM, message))
        else {
            return reply(BMI_QUESTION, vec![]);
        };
        self.answer_with("BMI_Calculator", &format!("{weight},{height}"), |out| {
            format!("{out}. A BMI between 18.5 and 24.9 is considered a healthy weight for most adults.")
        })
        .await
    }

    async fn calories(&self, message: &str) -> Answer {
        let age = capture(&AGE, message);
        let weight = capture(&WEIGHT_KG, message);
        let height = capture(&HEIGHT_CM, message);
        let sex = capture(&SEX, message).map(|s| normalize_sex(&s));
        let activity = capture(&ACTIVITY, message);

        let missing: Vec<&str> = [
            (age.is_none(), "age"),
            (weight.is_none(), "weight in kg"),
            (height.is_none(), "height in cm"),
            (sex.is_none(), "sex"),
            (
                activity.is_none(),
                "activity level (sedentary, light, moderate, active or very active)",
            ),
        ]
        .into_iter()
        .filter_map(|(absent, field)| absent.then_some(field))
        .collect();

        if let (Some(age), Some(weight), Some(height), Some(sex), Some(activity)) =
            (age, weight, height, sex, activity)
        {
            let raw = format!("{age},{weight},{height},{sex},{activity}");
            return self
                .answer_with("Calorie_Calculator", &raw, |out| {
                    format!("{out} to maintain your current weight.")
                })
                .await;
        }

        reply(
            &format!(
                "To estimate your daily calories I still need your {}.",
                missing.join(", ")
            ),
            vec![],
        )
    }

    async fn activities(&self, message: &str) -> Answer {
        let Some(energy) = capture(&ENERGY, message) else {
            return reply(ENERGY_QUESTION, vec![]);
        };
        // Mood does not change the suggestions
        self.answer_with("Wellness_Activities", &format!("unspecified,{energy}"), |out| {
            format!("{out}.")
        })
        .await
    }

    async fn stress(&self, message: &str) -> Answer {
        let level = assess_stress(message);
        self.answer_with("Stress_Assessment", message, |out| {
            if level == StressLevel::Low {
                out.to_string()
            } else {
                format!("{out} If it would help, I can suggest a few calming activities.")
            }
        })
        .await
    }

    async fn answer_with(
        &self,
        tool: &str,
        raw_input: &str,
        frame: impl FnOnce(&str) -> String,
    ) -> Answer {
        match self.call(tool, raw_input).await {
            Some(invocation) if invocation.succeeded => {
                let text = frame(&invocation.output_text);
                reply(&text, vec![invocation])
            }
            Some(invocation) => {
                let text = format!(
                    "I couldn't work that out from your message. {}",
                    invocation.output_text
                );
                reply(&text, vec![invocation])
            }
            None => reply(HELP_TEXT, vec![]),
        }
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

fn normalize_sex(word: &str) -> &'static str {
    match word.to_lowercase().as_str() {
        "male" | "man" | "boy" | "guy" => "male",
        _ => "female",
    }
}

fn reply(text: &str, steps: Vec<ToolInvocation>) -> Answer {
    Answer {
        text: text.to_string(),
        steps,
        iterations: 1,
        hit_iteration_cap: false,
    }
}

#[async_trait]
impl ReasoningEngine for RuleEngine {
    async fn run(&self, ctx: AgentContext) -> Result<Answer, AgentError> {
        let message = ctx.user_message.as_str();
        let intent = Intent::classify(message);
        tracing::debug!(?intent, "Rule engine routed message");
        let answer = match intent {
            Intent::Bmi => self.bmi(message).await,
            Intent::Calories => self.calories(message).await,
            Intent::Activities => self.activities(message).await,
            Intent::Stress => self.stress(message).await,
            Intent::Help => reply(HELP_TEXT, vec![]),
        };
        Ok(answer)
    }

    fn name(&self) -> &str {
        "rules"
    }
}
