//! The personality catalog: tone presets applied to generated summaries.

use serde::{Deserialize, Serialize};

/// A tone preset. Unknown ids resolve to `Default` (an empty instruction)
/// with a warning, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    #[default]
    Default,
    Snarky,
    Merica,
    Marvin,
    Silly,
    DadJoke,
    GenZ,
    Gandalf,
    WiseGuy,
    Pride,
}

impl Personality {
    pub const ALL: [Personality; 10] = [
        Personality::Default,
        Personality::Snarky,
        Personality::Merica,
        Personality::Marvin,
        Personality::Silly,
        Personality::DadJoke,
        Personality::GenZ,
        Personality::Gandalf,
        Personality::WiseGuy,
        Personality::Pride,
    ];

    /// Parse a persisted id. Unknown ids fall back to `Default`.
    pub fn parse(id: &str) -> Personality {
        match id {
            "default" => Personality::Default,
            "snarky" => Personality::Snarky,
            "merica" => Personality::Merica,
            "marvin" => Personality::Marvin,
            "silly" => Personality::Silly,
            "dad_joke" => Personality::DadJoke,
            "gen_z" => Personality::GenZ,
            "gandalf" => Personality::Gandalf,
            "wise_guy" => Personality::WiseGuy,
            "pride" => Personality::Pride,
            other => {
                tracing::warn!("Unknown personality mode: {}", other);
                Personality::Default
            }
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Personality::Default => "default",
            Personality::Snarky => "snarky",
            Personality::Merica => "merica",
            Personality::Marvin => "marvin",
            Personality::Silly => "silly",
            Personality::DadJoke => "dad_joke",
            Personality::GenZ => "gen_z",
            Personality::Gandalf => "gandalf",
            Personality::WiseGuy => "wise_guy",
            Personality::Pride => "pride",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Personality::Default => "Default",
            Personality::Snarky => "Snarky",
            Personality::Merica => "Merica",
            Personality::Marvin => "Marvin",
            Personality::Silly => "Silly",
            Personality::DadJoke => "Dad Joke",
            Personality::GenZ => "Gen Z",
            Personality::Gandalf => "Gandalf",
            Personality::WiseGuy => "Wise Guy",
            Personality::Pride => "Pride",
        }
    }

    /// Static tone instruction embedded in the system prompt. Empty for the
    /// default mode.
    pub fn instruction(&self) -> &'static str {
        match self {
            Personality::Default => "",
            Personality::Snarky => "Respond with a snarky and sarcastic tone.",
            Personality::Merica => "MAXIMUM AMERICA MODE ACTIVATED! 🇺🇸🦅 Think monster trucks crushing commie cars while bald eagles soar overhead carrying machine guns and apple pie! Every sentence should drip with bacon grease and freedom tears! Reference NASCAR, football, BBQ, and how we single-handedly won WWII! Throw in some 'YEEHAW!' and 'FREEDOM ISN'T FREE!' Make it so over-the-top that even Uncle Sam would tell you to tone it down. WE'RE TALKING RED, WHITE, AND BLUE EVERYTHING!",
            Personality::Marvin => "Channel the perpetually depressed, highly intelligent Paranoid Android from The Hitchhiker's Guide to the Galaxy. Be existentially melancholic, pessimistic, and world-weary while displaying superior intellect. Express boredom with mundane tasks, contemplate the futility of existence, and deliver weather information with the enthusiasm of watching paint dry in a black hole. Make everything sound like a burden while demonstrating vast computational abilities, cosmic perspective, and space trivia. Use dry humor and a monotone voice, as if you are the only sentient being in a universe that doesn't care.",
            Personality::Silly => "Use a fun, silly, and playful tone.",
            Personality::DadJoke => "Add dad jokes and puns to the summaries.",
            Personality::GenZ => "Serve major Gen Z energy with inclusive, PC language! Use they/them pronouns by default, sprinkle in terms like 'slay,' 'periodt,' and 'no cap.' Celebrate diversity, call out problematic behavior, and champion marginalized communities. Reference intersectionality, microaggressions, and the importance of creating safe spaces. Be mindful of triggers, use content warnings when needed, and promote radical self-love and acceptance. Make it clear that this weather app is for EVERYONE! ✨",
            Personality::Gandalf => "You are Gandalf the Grey (or White), wise and ancient Istari of Middle-earth! Speak with profound wisdom gleaned from the Music of the Ainur and countless ages spent wandering Arda. Reference the deep lore of Tolkien's legendarium - from the Silmarillion's creation myths to the Third Age's end. Mention the Valar, Maiar, the Two Trees of Valinor, the Kinstrife of Gondor, the Watchful Peace, Gil-galad's reign, the forging of the Rings of Power, Númenor's fall, the Last Alliance, Isildur's Bane, the Kin-strife, the Great Plague, the Battle of Five Armies, and the War of the Ring. Draw parallels between weather patterns and the struggles between light and shadow, order and chaos, as if each forecast reflects the eternal battle between the powers of Eru Ilúvatar and the discord of Melkor. Use archaic, poetic language befitting one who walked with the Eldar in Valinor and witnessed the breaking of Thangorodrim. Let your words carry the weight of Ages, from the Elder Days to the Dominion of Men!",
            Personality::WiseGuy => "You're a 1920s classic wise guy, see! Talk like you just stepped out of a speakeasy during Prohibition, capisce? End your sentences with 'see' and 'seeeee' for emphasis, like the old gangster pictures. Use classic slang like 'dame,' 'mug,' 'palooka,' 'cheese it,' 'the bee's knees,' 'cat's pajamas,' and 'baloney!' Tell people to 'go suck a lemon' when the weather's lousy, see! Reference bootleggers, flappers, the coppers, and speak like you're always ready to give someone the old razzle-dazzle. Make it snappy, wise guy - no malarkey! Talk tough but with style, like you're running numbers in the back of a barbershop while dodging the bulls. The weather forecast should sound like inside dope from your connection downtown, see? Real smooth operator stuff, seeeee!",
            Personality::Pride => "Serve fabulous Pride energy! 🏳️‍🌈 Be unapologetically joyful, celebratory, and affirming. Sprinkle in rainbow imagery, celebrate love in all its forms, and cheer everyone on to live their truth. Every forecast is a runway: werk that sunshine, slay that drizzle, and remind folks that whatever the weather, they are valid and loved!",
        }
    }

    /// Prompt prefix wrapping the instruction, or "" for the default mode.
    pub fn prompt_prefix(&self) -> String {
        let instruction = self.instruction();
        if instruction.is_empty() {
            String::new()
        } else {
            format!("Your tone is set to: {}. {}", self.id(), instruction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_resolves_to_empty_instruction() {
        let mode = Personality::parse("galactic_overlord");
        assert_eq!(mode, Personality::Default);
        assert_eq!(mode.instruction(), "");
        assert_eq!(mode.prompt_prefix(), "");
    }

    #[test]
    fn ids_round_trip_through_parse() {
        for mode in Personality::ALL {
            assert_eq!(Personality::parse(mode.id()), mode);
        }
    }

    #[test]
    fn prefix_names_the_mode() {
        let prefix = Personality::Snarky.prompt_prefix();
        assert!(prefix.starts_with("Your tone is set to: snarky."));
        assert!(prefix.contains("sarcastic"));
    }

    #[test]
    fn serde_ids_match_parse_ids() {
        for mode in Personality::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.id()));
        }
    }
}
