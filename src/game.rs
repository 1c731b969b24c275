pub mod node;
pub mod oracle;
pub mod state;
pub mod tree;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::GameConfig;
use crate::console::{Chooser, Console, Narrator};
use crate::error::InputClosed;
use node::{Next, NodeId, Outcome, Step};
use oracle::{Oracle, RngOracle};
use state::GameState;

const GOODBYE: &str = "Goodbye — may your curiosity never end!";

/// Logged as JSON when a round ends.
#[derive(Debug, Serialize)]
struct RoundSummary<'a> {
    outcome: Outcome,
    #[serde(flatten)]
    state: &'a GameState,
    transitions: usize,
    final_node: NodeId,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One player at one console, playing rounds until they quit.
pub struct Session<C, O> {
    console: C,
    oracle: O,
    state: GameState,
}

impl<C: Narrator + Chooser, O: Oracle> Session<C, O> {
    pub fn new(console: C, oracle: O) -> Self {
        Self {
            console,
            oracle,
            state: GameState::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn into_console(self) -> C {
        self.console
    }

    fn show_and_apply(&mut self, node: NodeId, step: &Step) -> Result<()> {
        for text in &step.narration {
            self.console.narrate(text)?;
        }
        for effect in &step.effects {
            debug!("Effect at {node}: {effect:?}");
            self.state.apply(*effect);
        }
        Ok(())
    }

    fn summary_json(
        &self,
        outcome: Outcome,
        transitions: usize,
        final_node: NodeId,
    ) -> serde_json::Result<String> {
        serde_json::to_string(&RoundSummary {
            outcome,
            state: &self.state,
            transitions,
            final_node,
        })
    }

    /// Play from `start` with a fresh state until a terminal node is reached.
    pub fn play_round(&mut self) -> Result<Outcome> {
        self.state.reset();
        let mut node = NodeId::Start;
        let mut transitions = 0;

        info!("Round started at {node}");

        loop {
            let mut step = tree::enter(node, &self.state, &mut self.oracle);
            self.show_and_apply(node, &step)?;

            let choice = match &step.next {
                Next::Menu(options) => Some(self.console.choose(options)?),
                _ => None,
            };
            if let Some(choice) = choice {
                debug!("Choice at {node}: option {}", choice + 1);
                step = tree::choose(node, choice, &self.state, &mut self.oracle);
                self.show_and_apply(node, &step)?;
            }

            match step.next {
                Next::Goto(next) => {
                    debug!("Transition: {node} -> {next}");
                    node = next;
                    transitions += 1;
                }
                Next::Finish(outcome) => {
                    info!("Round over at {node} ({outcome:?})");
                    match self.summary_json(outcome, transitions, node) {
                        Ok(json) => debug!("Round summary: {json}"),
                        Err(err) => warn!("Could not encode round summary: {err}"),
                    }
                    return Ok(outcome);
                }
                Next::Menu(_) => warn!("Choice at {node} asked for another menu; re-entering"),
            }
        }
    }

    fn show_game_over(&mut self, outcome: Outcome) -> Result<()> {
        self.console.line("")?;
        if outcome.is_win() {
            self.console.line("🎉 You finished the adventure — a good ending!")?;
        } else {
            self.console.line("😅 That was rough — try again!")?;
        }
        let inventory = self.state.inventory_line();
        self.console.line(&inventory)
    }

    /// Returns `true` to play again, `false` to quit.
    fn prompt_restart(&mut self) -> Result<bool> {
        Ok(self.console.choose(&["Play again", "Quit"])? == 0)
    }

    fn play(&mut self) -> Result<()> {
        loop {
            let outcome = self.play_round()?;
            self.show_game_over(outcome)?;

            if !self.prompt_restart()? {
                info!("Player quit");
                return self.console.narrate(GOODBYE);
            }

            info!("Player chose to restart");
        }
    }

    /// Run rounds until the player quits. A closed input stream counts as
    /// quitting.
    pub fn run(&mut self) -> Result<()> {
        match self.play() {
            Err(err) if err.is::<InputClosed>() => {
                info!("Input closed; ending session");
                self.console.line("")?;
                self.console.narrate(GOODBYE)
            }
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

pub fn run(config: &GameConfig) -> Result<()> {
    let console = Console::stdio(config.wrap_width);
    let oracle = RngOracle::from_seed(config.seed);
    Session::new(console, oracle).run()
}
