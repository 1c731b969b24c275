use std::fmt;

use serde::Serialize;

use crate::game::state::Effect;

/// Every place the story can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Start,
    BankPath,
    FollowRabbit,
    BigBlueDoor,
    TinyKeyhole,
    /// The mouse's crumb offer, after the keyhole turns out to be too small.
    MouseCrumbs,
    EatCake,
    Teaparty,
    RiddleSession,
    OfferRiddle,
    SneakGarden,
    TalkGardeners,
    PickRose,
    HideHedge,
    ApproachQueen,
    ProveKnave,
    WinGame,
    EndingBad,
}

impl NodeId {
    #[cfg(test)]
    pub const ALL: [NodeId; 18] = [
        NodeId::Start,
        NodeId::BankPath,
        NodeId::FollowRabbit,
        NodeId::BigBlueDoor,
        NodeId::TinyKeyhole,
        NodeId::MouseCrumbs,
        NodeId::EatCake,
        NodeId::Teaparty,
        NodeId::RiddleSession,
        NodeId::OfferRiddle,
        NodeId::SneakGarden,
        NodeId::TalkGardeners,
        NodeId::PickRose,
        NodeId::HideHedge,
        NodeId::ApproachQueen,
        NodeId::ProveKnave,
        NodeId::WinGame,
        NodeId::EndingBad,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeId::Start => "start",
            NodeId::BankPath => "bank_path",
            NodeId::FollowRabbit => "follow_rabbit",
            NodeId::BigBlueDoor => "big_blue_door",
            NodeId::TinyKeyhole => "tiny_keyhole",
            NodeId::MouseCrumbs => "mouse_crumbs",
            NodeId::EatCake => "eat_cake",
            NodeId::Teaparty => "teaparty",
            NodeId::RiddleSession => "riddle_session",
            NodeId::OfferRiddle => "offer_riddle",
            NodeId::SneakGarden => "sneak_garden",
            NodeId::TalkGardeners => "talk_gardeners",
            NodeId::PickRose => "pick_rose",
            NodeId::HideHedge => "hide_hedge",
            NodeId::ApproachQueen => "approach_queen",
            NodeId::ProveKnave => "prove_knave",
            NodeId::WinGame => "win_game",
            NodeId::EndingBad => "ending_bad",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::Won
    }
}

/// What happens after a step's narration has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Ask the player; the answer goes back to the same node.
    Menu(Vec<&'static str>),
    /// Move on without asking.
    Goto(NodeId),
    /// The round is over.
    Finish(Outcome),
}

/// Result of entering a node or resolving a choice in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub narration: Vec<String>,
    /// Applied to the game state, in order, before `next` is followed.
    pub effects: Vec<Effect>,
    pub next: Next,
}

impl Step {
    pub fn new(next: Next) -> Self {
        Self {
            narration: Vec::new(),
            effects: Vec::new(),
            next,
        }
    }

    pub fn goto(node: NodeId) -> Self {
        Self::new(Next::Goto(node))
    }

    pub fn menu(options: &[&'static str]) -> Self {
        Self::new(Next::Menu(options.to_vec()))
    }

    pub fn finish(outcome: Outcome) -> Self {
        Self::new(Next::Finish(outcome))
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.narration.push(text.into());
        self
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}
