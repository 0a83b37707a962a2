//! Player-name disambiguation against the score history.
use crate::constants::DEFAULT_PLAYER_NAME;
use crate::ledger::{Ledger, ScoreStore};
use crate::score::PlayerStats;

/// How a proposed name relates to the recorded history.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// No game has been recorded under this name.
    FirstTime,
    /// Exactly one recorded game.
    Returning(PlayerStats),
    /// Two or more recorded games; the prompt also shows the average.
    Frequent(PlayerStats),
}

impl Recognition {
    #[must_use]
    pub fn stats(&self) -> Option<&PlayerStats> {
        match self {
            Self::FirstTime => None,
            Self::Returning(stats) | Self::Frequent(stats) => Some(stats),
        }
    }
}

/// Answer to "are you the same person?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityChoice {
    /// Reuse the recorded name.
    Confirm,
    /// Pick another name and check again.
    Reject,
    /// Leave name selection; no game is played.
    Cancel,
}

/// Interactive side of name resolution, provided by the front-end.
pub trait IdentityPrompt {
    /// Ask for a name. An empty answer is allowed.
    fn ask_name(&mut self) -> String;

    /// Ask a recognised player to confirm their identity.
    fn confirm_identity(&mut self, name: &str, recognition: &Recognition) -> IdentityChoice;

    /// Greet the accepted player.
    fn welcome(&mut self, name: &str, recognition: &Recognition);
}

/// Decides which name a game is recorded under.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    default_name: String,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_NAME)
    }
}

impl IdentityResolver {
    #[must_use]
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
        }
    }

    /// Trimmed name, or the default label when nothing was typed.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.default_name.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Classify `name` by the number of recorded games under it.
    pub fn recognize<S: ScoreStore>(&self, ledger: &Ledger<S>, name: &str) -> Recognition {
        match ledger.count_by_player(name) {
            0 => Recognition::FirstTime,
            1 => Recognition::Returning(ledger.stats_for_player(name)),
            _ => Recognition::Frequent(ledger.stats_for_player(name)),
        }
    }

    /// Loop until the player confirms a name or cancels.
    ///
    /// Returns `None` on cancel.
    pub fn resolve<S, P>(&self, ledger: &Ledger<S>, prompt: &mut P) -> Option<String>
    where
        S: ScoreStore,
        P: IdentityPrompt + ?Sized,
    {
        loop {
            let name = self.normalize(&prompt.ask_name());
            let recognition = self.recognize(ledger, &name);
            if recognition == Recognition::FirstTime {
                log::debug!("new player {name}");
                prompt.welcome(&name, &recognition);
                return Some(name);
            }
            match prompt.confirm_identity(&name, &recognition) {
                IdentityChoice::Confirm => {
                    log::debug!("returning player {name} confirmed");
                    prompt.welcome(&name, &recognition);
                    return Some(name);
                }
                IdentityChoice::Reject => {
                    log::debug!("player rejected recorded name {name}");
                }
                IdentityChoice::Cancel => return None,
            }
        }
    }
}
