use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;

/// Supplies topic candidates for the selection loop.
pub trait TopicSource: Send + Sync {
    fn next_topic(&self) -> String;
}

impl TopicSource for Box<dyn TopicSource> {
    fn next_topic(&self) -> String {
        (**self).next_topic()
    }
}

const SUBJECTS: &[&str] = &[
    "AI Prompt Engineering",
    "ChatGPT Workflows",
    "Claude Tips",
    "Gemini Advanced Features",
    "AI Image Generation",
    "AI Music Production",
    "AI Coding Assistants",
    "AI Writing",
    "AI Translation",
    "AI Data Analysis",
    "Machine Learning Basics",
    "Deep Learning for Beginners",
    "AI Ethics",
    "AI for Small Business",
    "AI in Education",
    "AI Automation",
    "AI Trends",
    "Perplexity Search",
    "Midjourney",
    "Stable Diffusion",
    "AI Video Editing",
    "AI Presentations",
    "AI Marketing",
    "No-Code AI Tools",
    "AI APIs",
    "AI Privacy and Security",
    "AI Collaboration Tools",
    "AI Productivity",
];

const ANGLES: &[&str] = &[
    "Up-to-Date",
    "Beginner-Friendly",
    "Expert-Level",
    "Hands-On",
    "Five-Minute",
    "Complete",
    "Essential",
    "Mistake-Proof",
    "Free-to-Start",
    "Cost-Saving",
    "Time-Saving",
    "Creative",
    "Real-World",
    "Step-by-Step",
    "Advanced",
    "Hidden-Feature",
];

const AUDIENCES: &[&str] = &[
    "Office Workers",
    "Students",
    "Founders",
    "Freelancers",
    "Developers",
    "Designers",
    "Marketers",
    "Teachers",
    "Researchers",
    "Content Creators",
    "Bloggers",
    "YouTubers",
    "Writers",
    "Team Leads",
    "Startups",
];

const FORMATS: &[&str] = &[
    "Guide",
    "Checklist",
    "Comparison",
    "Q&A",
    "Review",
    "Tutorial",
    "Tip Roundup",
    "Case Study",
    "Experiment",
    "Benchmark",
    "Roadmap",
    "Playbook",
];

/// Builds topics by combining a subject, an angle, an audience and a format
/// in one of a handful of sentence shapes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTopicGenerator;

impl RandomTopicGenerator {
    pub fn new() -> Self {
        Self
    }

    fn pick<R: Rng>(rng: &mut R, words: &'static [&'static str]) -> &'static str {
        words.choose(rng).copied().unwrap_or_default()
    }

    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> String {
        let subject = Self::pick(rng, SUBJECTS);
        let angle = Self::pick(rng, ANGLES);
        let audience = Self::pick(rng, AUDIENCES);
        let format = Self::pick(rng, FORMATS);

        match rng.gen_range(0..5) {
            0 => format!("{} {} {}", angle, subject, format),
            1 => format!("{} for {}: A {}", subject, audience, format),
            2 => format!("{} - {} {}", subject, angle, format),
            3 => format!("{}: The {} {}", subject, audience, format),
            _ => format!(
                "[{}] {} {} Recap",
                Local::now().format("%B %Y"),
                subject,
                angle
            ),
        }
    }
}

impl TopicSource for RandomTopicGenerator {
    fn next_topic(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }
}

/// Always returns the same topic, used for `--topic`.
#[derive(Debug, Clone)]
pub struct FixedTopic(pub String);

impl TopicSource for FixedTopic {
    fn next_topic(&self) -> String {
        self.0.clone()
    }
}
