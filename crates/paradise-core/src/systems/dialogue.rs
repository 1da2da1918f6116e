//! Dialogue selection - picks a line for an agent from its topic pools

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::AgentId;
use crate::error::ConfigError;

/// Conversation topics the host can ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Greeting,
    Love,
    Funny,
    Compliment,
    Farewell,
    Fallback,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Greeting,
        Topic::Love,
        Topic::Funny,
        Topic::Compliment,
        Topic::Farewell,
        Topic::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Greeting => "greeting",
            Topic::Love => "love",
            Topic::Funny => "funny",
            Topic::Compliment => "compliment",
            Topic::Farewell => "farewell",
            Topic::Fallback => "fallback",
        }
    }

    /// Case-insensitive; anything unrecognised is `Fallback`
    pub fn parse(category: &str) -> Topic {
        let category = category.trim();
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(category))
            .unwrap_or(Topic::Fallback)
    }
}

impl std::str::FromStr for Topic {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Topic::parse(s))
    }
}

/// Everything one agent can say
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLines {
    pub greeting: Vec<String>,
    pub love: Vec<String>,
    pub funny: Vec<String>,
    pub compliment: Vec<String>,
    pub farewell: Vec<String>,
    pub fallback: Vec<String>,
    /// Ambient lines used instead of any topic while seated at the fire
    pub campfire: Vec<String>,
}

impl AgentLines {
    pub fn pool(&self, topic: Topic) -> &[String] {
        match topic {
            Topic::Greeting => &self.greeting,
            Topic::Love => &self.love,
            Topic::Funny => &self.funny,
            Topic::Compliment => &self.compliment,
            Topic::Farewell => &self.farewell,
            Topic::Fallback => &self.fallback,
        }
    }

    fn from_static(pools: [&[&str]; 7]) -> Self {
        let owned = |lines: &[&str]| lines.iter().map(|l| l.to_string()).collect();
        Self {
            greeting: owned(pools[0]),
            love: owned(pools[1]),
            funny: owned(pools[2]),
            compliment: owned(pools[3]),
            farewell: owned(pools[4]),
            fallback: owned(pools[5]),
            campfire: owned(pools[6]),
        }
    }
}

/// Line pools for every agent.
///
/// Only constructed through [`DialogueBook::default`] or
/// [`DialogueBook::from_json_str`], both of which guarantee a non-empty
/// fallback pool per agent, so [`DialogueBook::respond`] always has
/// something to say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueBook {
    jb: AgentLines,
    bea: AgentLines,
    choco: AgentLines,
}

impl DialogueBook {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let book: DialogueBook = serde_json::from_str(json)?;
        book.validate()?;
        Ok(book)
    }

    pub fn lines(&self, agent: AgentId) -> &AgentLines {
        match agent {
            AgentId::Jb => &self.jb,
            AgentId::Bea => &self.bea,
            AgentId::Choco => &self.choco,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for agent in AgentId::ALL {
            let lines = self.lines(agent);
            if lines.fallback.iter().all(|l| l.trim().is_empty()) {
                return Err(ConfigError::invalid(format!(
                    "{} needs at least one fallback line",
                    agent
                )));
            }
            let pools = Topic::ALL
                .iter()
                .map(|t| lines.pool(*t))
                .chain(std::iter::once(lines.campfire.as_slice()));
            if pools.flatten().any(|l| l.trim().is_empty()) {
                return Err(ConfigError::invalid(format!("{} has a blank line", agent)));
            }
        }
        Ok(())
    }

    /// Pick a line for `agent`.
    ///
    /// In the seated campfire context the ambient pool wins outright and
    /// `category` is ignored. Otherwise the category's pool is used, or the
    /// fallback pool when that category has no lines.
    pub fn respond(
        &self,
        agent: AgentId,
        category: &str,
        seated: bool,
        rng: &mut impl Rng,
    ) -> &str {
        let lines = self.lines(agent);
        let pool = if seated && !lines.campfire.is_empty() {
            &lines.campfire[..]
        } else {
            let pool = lines.pool(Topic::parse(category));
            if pool.is_empty() {
                &lines.fallback[..]
            } else {
                pool
            }
        };
        pool.choose(rng).map(String::as_str).unwrap_or_default()
    }
}

impl Default for DialogueBook {
    fn default() -> Self {
        Self {
            jb: AgentLines::from_static([
                &["Hey you! There you are.", "Oh hi, I was just thinking about you."],
                &["You know I'd pick you every time.", "Every day with you is my favourite day."],
                &["I tried to teach Choco to fetch. He taught me to nap instead."],
                &["You make this whole place brighter.", "Have I told you you're amazing today?"],
                &["Don't go too far, okay?", "See you in a bit."],
                &["Hmm?", "Say that again?", "I'm just happy you're here."],
                &["The fire's nice tonight.", "I could sit here forever.", "Listen to it crackle."],
            ]),
            bea: AgentLines::from_static([
                &["Hiii!", "Look who showed up!"],
                &["I love you more, and that's final.", "You're my favourite person in the world."],
                &["Choco stole my sandwich again. I'm choosing to be proud of him."],
                &["You have the best laugh.", "You always know what to say."],
                &["Bye for now!", "Come back soon, okay?"],
                &["What was that?", "Hehe, okay.", "You're cute when you're confused."],
                &[
                    "Warm hands, warm heart.",
                    "Look at the sparks go up.",
                    "This is my favourite spot.",
                ],
            ]),
            choco: AgentLines::from_static([
                &["Woof!", "*wags tail*"],
                &["*licks your hand*", "*rolls over for belly rubs*"],
                &["*chases own tail*", "*sneezes*"],
                &["*happy panting*"],
                &["*whines softly*", "*tilts head*"],
                &["Woof?", "*sniffs curiously*"],
                &["*curls up by the fire*", "*sleepy sigh*"],
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_topic_parsing() {
        assert_eq!(Topic::parse("LOVE"), Topic::Love);
        assert_eq!(Topic::parse(" Greeting "), Topic::Greeting);
        assert_eq!(Topic::parse("unknown-category"), Topic::Fallback);
        assert_eq!("funny".parse::<Topic>(), Ok(Topic::Funny));
    }

    #[test]
    fn test_respond_draws_from_category() {
        let book = DialogueBook::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let line = book.respond(AgentId::Jb, "love", false, &mut rng);
            assert!(!line.is_empty());
            assert!(book.lines(AgentId::Jb).love.iter().any(|l| l == line));
        }
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let book = DialogueBook::default();
        let mut rng = StdRng::seed_from_u64(42);
        let line = book.respond(AgentId::Jb, "unknown-category", false, &mut rng);
        assert!(book.lines(AgentId::Jb).fallback.iter().any(|l| l == line));
    }

    #[test]
    fn test_campfire_overrides_category() {
        let book = DialogueBook::default();
        let mut rng = StdRng::seed_from_u64(7);
        for topic in Topic::ALL {
            let line = book.respond(AgentId::Bea, topic.as_str(), true, &mut rng);
            assert!(book.lines(AgentId::Bea).campfire.iter().any(|l| l == line));
        }
    }

    #[test]
    fn test_missing_topic_uses_fallback() {
        let json = r#"{
            "jb": { "fallback": ["hm"] },
            "bea": { "fallback": ["eh"], "love": ["<3"] },
            "choco": { "fallback": ["woof"] }
        }"#;
        let book = DialogueBook::from_json_str(json).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(book.respond(AgentId::Jb, "love", false, &mut rng), "hm");
        assert_eq!(book.respond(AgentId::Bea, "love", false, &mut rng), "<3");
        // No campfire pool means no override
        assert_eq!(
            book.respond(AgentId::Choco, "funny", true, &mut rng),
            "woof"
        );
    }

    #[test]
    fn test_book_without_fallback_rejected() {
        let json = r#"{
            "jb": { "fallback": ["hm"] },
            "bea": { "love": ["x"] },
            "choco": { "fallback": ["w"] }
        }"#;
        assert!(matches!(
            DialogueBook::from_json_str(json),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
