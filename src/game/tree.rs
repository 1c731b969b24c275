use log::warn;

use crate::game::node::{NodeId, Outcome, Step};
use crate::game::oracle::Oracle;
use crate::game::state::{Effect, GameState, Item};

/// Odds that the mouse's crumb hunt turns something up.
pub const CRUMB_CHANCE: f64 = 0.6;

/// (question, answer). Only the question is ever spoken.
const RIDDLES: [(&str, &str); 2] = [
    (
        "Why is a raven like a writing desk?",
        "Because it can produce a few notes, though they are very flat; and it is nevar put with the wrong end in front.",
    ),
    (
        "What goes on four legs in the morning...",
        "Man (a classical riddle)",
    ),
];

const WIN_ENDINGS: [&str; 3] = [
    "The Queen, in a rare good mood, grants you a curious medal saying 'For Very Curious Behavior'.",
    "You find yourself back on the bank, holding a painted rose — was it all a dream?",
    "A Cheshire Cat appears, grins, and says 'You're quite all right.' You wake up smiling.",
];

const LOSE_ENDINGS: [&str; 3] = [
    "The Queen shouts and you are chased — you tumble, awake, and realise it was the sun on your face.",
    "Guards escort you away; you manage a narrow escape but lose some belongings.",
    "You wake up in a teapot. The Dormouse scowls. You decide to be more careful next time.",
];

// ---------------------------------------------------------------------------
// Entering a node
// ---------------------------------------------------------------------------

/// Narration and entry effects of `node`, plus where the story goes next.
///
/// Guards read `state` as it was before this step's effects are applied.
pub fn enter(node: NodeId, state: &GameState, oracle: &mut dyn Oracle) -> Step {
    match node {
        NodeId::Start => Step::menu(&["Follow the White Rabbit", "Explore the bank / have a nap"])
            .say("You are Alice. You wake on a sunny bank and notice a curious rabbit wearing a waistcoat.")
            .say("Something shiny glints from the rabbit's pocket. You can follow the rabbit or explore the bank."),

        NodeId::FollowRabbit => Step::menu(&[
            "Open the big blue door",
            "Try the tiny keyhole",
            "Eat the 'EAT ME' cake",
        ])
        .with(Effect::Curiosity(1))
        .say("You follow the rabbit down a hole — it's deeper than it looks! You tumble through a corridor of floating clocks.")
        .say("At the bottom there's a corridor with three doors and a small cake labelled 'EAT ME'."),

        NodeId::BankPath => {
            let (riddle, _answer) = RIDDLES[oracle.pick(RIDDLES.len())];
            Step::menu(&["Answer the riddle", "Ignore and walk on"])
                .say("You wander around, daydreaming. A Caterpillar appears on a mushroom and asks you a riddle.")
                .say(format!("Caterpillar asks: {riddle}"))
        }

        NodeId::BigBlueDoor => Step::menu(&[
            "Sneak past the gardeners",
            "Talk to the gardeners",
            "Pick a rose and run",
        ])
        .say("The big blue door swings open to a grand garden — the Queen's gardeners are painting roses red."),

        NodeId::TinyKeyhole => {
            let peek = "You peer through the tiny keyhole and see a teapot on a table. It's just the size for a mouse.";
            if state.contains(Item::MushroomSlice) {
                Step::menu(&["Eat mushroom slice", "Don't eat it"])
                    .say(peek)
                    .say("You remember the mushroom slice. Eat a bit to shrink and slip through?")
            } else {
                Step::goto(NodeId::MouseCrumbs).say(peek)
            }
        }

        NodeId::MouseCrumbs => Step::menu(&["Search nearby for crumbs", "Give up and go back"])
            .say("You cannot fit, but a mouse offers to help if you find some biscuit crumbs."),

        NodeId::EatCake => Step::menu(&["Hide behind a hedge", "Approach the Queen politely"])
            .with(Effect::Gain(Item::Tall))
            .with(Effect::Curiosity(1))
            .say("You nibble the cake. You feel odd... taller. Very tall.")
            .say("From your height you can see a croquet ground. The Queen is nearby. She doesn't like tall newcomers."),

        NodeId::Teaparty => Step::menu(&[
            "Join the riddles",
            "Steal a cup and run",
            "Offer a riddle of your own",
        ])
        .say("You join a mad tea party with the Hatter and March Hare. They serve riddles and nonsensical tea."),

        NodeId::RiddleSession => Step::goto(NodeId::BigBlueDoor)
            .with(Effect::Gain(Item::MusicNote))
            .with(Effect::Curiosity(1))
            .say("Their riddles make you laugh so hard that you learn a secret: a door behind a portrait opens with music."),

        NodeId::OfferRiddle => Step::goto(NodeId::BigBlueDoor)
            .say("You offer a clever riddle. They applaud so loudly the Dormouse wakes and points you toward the Queen's garden."),

        NodeId::SneakGarden => Step::menu(&["Play along", "Refuse and run"])
            .say("You creep past the gardeners. A card soldier spots you and challenges you to a silly game."),

        NodeId::TalkGardeners => Step::goto(NodeId::BigBlueDoor)
            .with(Effect::Gain(Item::GardenSecret))
            .say("You talk politely. They reveal they're painting roses because the Queen can't be bothered to grow them red."),

        NodeId::PickRose => {
            let picked = "You pick a rose. The gardener gasps — the Queen notices and chases after you.";
            if state.contains(Item::Small) {
                Step::goto(NodeId::WinGame)
                    .say(picked)
                    .say("You slip into a rabbit hole and escape. Safe... for now.")
            } else {
                Step::goto(NodeId::EndingBad).say(picked)
            }
        }

        NodeId::HideHedge => Step::menu(&["Help the Knave prove innocence", "Stay hidden — it's risky"])
            .say("Hidden in the hedge you overhear a conspiracy: the Knave is being accused of stealing tarts."),

        NodeId::ApproachQueen => {
            let approach = "You approach. The Queen looks at you with suspicion. 'Why are you so tall?' she asks.";
            if state.contains(Item::MushroomSlice) || state.contains(Item::Small) {
                Step::goto(NodeId::WinGame)
                    .say(approach)
                    .say("Your size confuses her less. She laughs and invites you to croquet. You play and impress her.")
            } else {
                Step::goto(NodeId::EndingBad)
                    .say(approach)
                    .say("The Queen is not impressed. Guards appear, and you tumble away.")
            }
        }

        NodeId::ProveKnave => {
            let evidence = "You gather evidence: crumbs, the painted-rose, and the garden-secret. The court listens.";
            if state.contains(Item::PaintedRose) || state.contains(Item::MusicNote) {
                Step::goto(NodeId::WinGame)
                    .say(evidence)
                    .say("Your evidence is convincing. The Knave is freed and thanks you warmly. The Queen reluctantly applauds.")
            } else {
                Step::goto(NodeId::FollowRabbit)
                    .say(evidence)
                    .say("Your evidence is thin. The Queen is unconvinced. You're sent to fetch more clues.")
            }
        }

        NodeId::WinGame => {
            Step::finish(Outcome::Won).say(WIN_ENDINGS[oracle.pick(WIN_ENDINGS.len())])
        }

        NodeId::EndingBad => {
            Step::finish(Outcome::Lost).say(LOSE_ENDINGS[oracle.pick(LOSE_ENDINGS.len())])
        }
    }
}

// ---------------------------------------------------------------------------
// Resolving a menu choice
// ---------------------------------------------------------------------------

/// Resolve the 0-based `choice` made at `node`'s menu.
///
/// Any index past the listed options takes the last branch. Nodes without a
/// menu are simply re-entered.
pub fn choose(node: NodeId, choice: usize, state: &GameState, oracle: &mut dyn Oracle) -> Step {
    match (node, choice) {
        (NodeId::Start, 0) => Step::goto(NodeId::FollowRabbit),
        (NodeId::Start, _) => Step::goto(NodeId::BankPath),

        (NodeId::BankPath, 0) => Step::goto(NodeId::FollowRabbit)
            .with(Effect::Gain(Item::MushroomSlice))
            .with(Effect::Curiosity(1))
            .say("You give a thoughtful answer. The Caterpillar grants you a magic mushroom slice."),
        (NodeId::BankPath, _) => Step::goto(NodeId::FollowRabbit)
            .with(Effect::Gain(Item::Shrunk))
            .with(Effect::Curiosity(-1))
            .say("You yawn and keep walking. Suddenly, everything goes a little sideways... you feel smaller."),

        (NodeId::FollowRabbit, 0) => Step::goto(NodeId::BigBlueDoor),
        (NodeId::FollowRabbit, 1) => Step::goto(NodeId::TinyKeyhole),
        (NodeId::FollowRabbit, _) => Step::goto(NodeId::EatCake),

        (NodeId::BigBlueDoor, 0) => Step::goto(NodeId::SneakGarden),
        (NodeId::BigBlueDoor, 1) => Step::goto(NodeId::TalkGardeners),
        (NodeId::BigBlueDoor, _) => Step::goto(NodeId::PickRose),

        (NodeId::TinyKeyhole, 0) => Step::goto(NodeId::Teaparty)
            .with(Effect::Consume(Item::MushroomSlice))
            .with(Effect::Gain(Item::Small))
            .say("You shrink down to mouse-size and squeeze through the keyhole into a cosy tea room."),
        (NodeId::TinyKeyhole, _) => Step::goto(NodeId::MouseCrumbs),

        (NodeId::MouseCrumbs, 0) => {
            if oracle.chance(CRUMB_CHANCE) {
                Step::goto(NodeId::Teaparty)
                    .with(Effect::Gain(Item::Small))
                    .say("You find crumbs! The mouse helps you inside.")
            } else {
                Step::goto(NodeId::FollowRabbit)
                    .say("No crumbs today. You head back, empty-handed.")
            }
        }
        (NodeId::MouseCrumbs, _) => Step::goto(NodeId::FollowRabbit),

        (NodeId::EatCake, 0) => Step::goto(NodeId::HideHedge),
        (NodeId::EatCake, _) => Step::goto(NodeId::ApproachQueen),

        (NodeId::Teaparty, 0) => Step::goto(NodeId::RiddleSession),
        (NodeId::Teaparty, 1) => Step::goto(NodeId::BigBlueDoor)
            .with(Effect::Curiosity(1))
            .say("You dash off with a steaming cup. The Hatter shrieks but the March Hare laughs."),
        (NodeId::Teaparty, _) => Step::goto(NodeId::OfferRiddle),

        (NodeId::SneakGarden, 0) => {
            if state.curiosity() > 0 || state.contains(Item::MusicNote) {
                Step::goto(NodeId::WinGame)
                    .with(Effect::Gain(Item::PaintedRose))
                    .say("You play the game cleverly and earn a tiny painted rose (they call you 'creative').")
            } else {
                Step::goto(NodeId::EndingBad)
                    .say("You fumble the rules and the card soldier reports you. The Queen shouts 'Off with their head!'")
            }
        }
        (NodeId::SneakGarden, _) => Step::goto(NodeId::FollowRabbit),

        (NodeId::HideHedge, 0) => Step::goto(NodeId::ProveKnave),
        (NodeId::HideHedge, _) => Step::goto(NodeId::FollowRabbit),

        (other, _) => {
            warn!("Node {other} has no menu; re-entering it");
            Step::goto(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::game::node::Next;
    use crate::game::oracle::ScriptedOracle;

    fn state_with(items: &[Item], curiosity: i32) -> GameState {
        let mut state = GameState::new();
        for item in items {
            state.add(*item);
        }
        state.adjust_curiosity(curiosity);
        state
    }

    fn next_of(step: &Step) -> NodeId {
        match step.next {
            Next::Goto(node) => node,
            ref other => panic!("expected a goto, got {other:?}"),
        }
    }

    fn menu_len(step: &Step) -> usize {
        match step.next {
            Next::Menu(ref options) => options.len(),
            ref other => panic!("expected a menu, got {other:?}"),
        }
    }

    #[test]
    fn start_branches() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new();
        assert_eq!(menu_len(&enter(NodeId::Start, &state, &mut oracle)), 2);
        assert_eq!(next_of(&choose(NodeId::Start, 0, &state, &mut oracle)), NodeId::FollowRabbit);
        assert_eq!(next_of(&choose(NodeId::Start, 1, &state, &mut oracle)), NodeId::BankPath);
    }

    #[test]
    fn follow_rabbit_raises_curiosity_on_entry() {
        let step = enter(NodeId::FollowRabbit, &GameState::new(), &mut ScriptedOracle::new());
        assert_eq!(step.effects, vec![Effect::Curiosity(1)]);
        assert_eq!(menu_len(&step), 3);
    }

    #[test]
    fn bank_path_uses_oracle_for_riddle() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new().with_picks(&[1]);
        let step = enter(NodeId::BankPath, &state, &mut oracle);
        assert!(step.narration[1].contains("four legs"));

        let answer = choose(NodeId::BankPath, 0, &state, &mut oracle);
        assert_eq!(
            answer.effects,
            vec![Effect::Gain(Item::MushroomSlice), Effect::Curiosity(1)]
        );
        assert_eq!(next_of(&answer), NodeId::FollowRabbit);

        let ignore = choose(NodeId::BankPath, 1, &state, &mut oracle);
        assert_eq!(ignore.effects, vec![Effect::Gain(Item::Shrunk), Effect::Curiosity(-1)]);
        assert_eq!(next_of(&ignore), NodeId::FollowRabbit);
    }

    #[test]
    fn keyhole_without_mushroom_goes_to_crumbs() {
        let step = enter(NodeId::TinyKeyhole, &GameState::new(), &mut ScriptedOracle::new());
        assert_eq!(next_of(&step), NodeId::MouseCrumbs);
    }

    #[test]
    fn keyhole_with_mushroom_offers_to_eat() {
        let state = state_with(&[Item::MushroomSlice], 1);
        let mut oracle = ScriptedOracle::new();
        assert_eq!(menu_len(&enter(NodeId::TinyKeyhole, &state, &mut oracle)), 2);

        let eat = choose(NodeId::TinyKeyhole, 0, &state, &mut oracle);
        assert_eq!(
            eat.effects,
            vec![Effect::Consume(Item::MushroomSlice), Effect::Gain(Item::Small)]
        );
        assert_eq!(next_of(&eat), NodeId::Teaparty);

        let decline = choose(NodeId::TinyKeyhole, 1, &state, &mut oracle);
        assert_eq!(next_of(&decline), NodeId::MouseCrumbs);
        assert!(decline.effects.is_empty());
    }

    #[test]
    fn crumb_search_follows_the_oracle() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new().with_chances(&[true, false]);

        let found = choose(NodeId::MouseCrumbs, 0, &state, &mut oracle);
        assert_eq!(found.effects, vec![Effect::Gain(Item::Small)]);
        assert_eq!(next_of(&found), NodeId::Teaparty);

        let missed = choose(NodeId::MouseCrumbs, 0, &state, &mut oracle);
        assert!(missed.effects.is_empty());
        assert_eq!(next_of(&missed), NodeId::FollowRabbit);

        let give_up = choose(NodeId::MouseCrumbs, 1, &state, &mut oracle);
        assert_eq!(next_of(&give_up), NodeId::FollowRabbit);
    }

    #[test]
    fn cake_makes_alice_tall() {
        let step = enter(NodeId::EatCake, &GameState::new(), &mut ScriptedOracle::new());
        assert_eq!(step.effects, vec![Effect::Gain(Item::Tall), Effect::Curiosity(1)]);
        assert_eq!(menu_len(&step), 2);
    }

    #[test]
    fn teaparty_routes() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new();
        assert_eq!(next_of(&choose(NodeId::Teaparty, 0, &state, &mut oracle)), NodeId::RiddleSession);
        let steal = choose(NodeId::Teaparty, 1, &state, &mut oracle);
        assert_eq!(steal.effects, vec![Effect::Curiosity(1)]);
        assert_eq!(next_of(&steal), NodeId::BigBlueDoor);
        assert_eq!(next_of(&choose(NodeId::Teaparty, 2, &state, &mut oracle)), NodeId::OfferRiddle);

        let riddles = enter(NodeId::RiddleSession, &state, &mut oracle);
        assert_eq!(riddles.effects, vec![Effect::Gain(Item::MusicNote), Effect::Curiosity(1)]);
        assert_eq!(next_of(&riddles), NodeId::BigBlueDoor);
        assert_eq!(next_of(&enter(NodeId::OfferRiddle, &state, &mut oracle)), NodeId::BigBlueDoor);
    }

    #[test]
    fn sneak_garden_guard() {
        let mut oracle = ScriptedOracle::new();
        let bold = state_with(&[], 1);
        let win = choose(NodeId::SneakGarden, 0, &bold, &mut oracle);
        assert_eq!(win.effects, vec![Effect::Gain(Item::PaintedRose)]);
        assert_eq!(next_of(&win), NodeId::WinGame);

        let musical = state_with(&[Item::MusicNote], -1);
        assert_eq!(next_of(&choose(NodeId::SneakGarden, 0, &musical, &mut oracle)), NodeId::WinGame);

        let timid = state_with(&[], 0);
        let lose = choose(NodeId::SneakGarden, 0, &timid, &mut oracle);
        assert!(lose.effects.is_empty());
        assert_eq!(next_of(&lose), NodeId::EndingBad);

        assert_eq!(next_of(&choose(NodeId::SneakGarden, 1, &timid, &mut oracle)), NodeId::FollowRabbit);
    }

    #[test]
    fn gardeners_share_a_secret() {
        let step = enter(NodeId::TalkGardeners, &GameState::new(), &mut ScriptedOracle::new());
        assert_eq!(step.effects, vec![Effect::Gain(Item::GardenSecret)]);
        assert_eq!(next_of(&step), NodeId::BigBlueDoor);
    }

    #[test]
    fn pick_rose_needs_small() {
        let mut oracle = ScriptedOracle::new();
        let small = state_with(&[Item::Small], 0);
        assert_eq!(next_of(&enter(NodeId::PickRose, &small, &mut oracle)), NodeId::WinGame);
        let tall = state_with(&[Item::Tall], 3);
        assert_eq!(next_of(&enter(NodeId::PickRose, &tall, &mut oracle)), NodeId::EndingBad);
    }

    #[test]
    fn hedge_routes() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new();
        assert_eq!(next_of(&choose(NodeId::HideHedge, 0, &state, &mut oracle)), NodeId::ProveKnave);
        assert_eq!(next_of(&choose(NodeId::HideHedge, 1, &state, &mut oracle)), NodeId::FollowRabbit);
    }

    #[test]
    fn queen_guard() {
        let mut oracle = ScriptedOracle::new();
        for item in [Item::MushroomSlice, Item::Small] {
            let state = state_with(&[item, Item::Tall], 0);
            assert_eq!(next_of(&enter(NodeId::ApproachQueen, &state, &mut oracle)), NodeId::WinGame);
        }
        let tall = state_with(&[Item::Tall], 5);
        assert_eq!(next_of(&enter(NodeId::ApproachQueen, &tall, &mut oracle)), NodeId::EndingBad);
    }

    #[test]
    fn knave_guard() {
        let mut oracle = ScriptedOracle::new();
        for item in [Item::PaintedRose, Item::MusicNote] {
            let state = state_with(&[item], 0);
            assert_eq!(next_of(&enter(NodeId::ProveKnave, &state, &mut oracle)), NodeId::WinGame);
        }
        let clueless = state_with(&[Item::GardenSecret], 2);
        assert_eq!(next_of(&enter(NodeId::ProveKnave, &clueless, &mut oracle)), NodeId::FollowRabbit);
    }

    #[test]
    fn terminals_pick_flavour_text() {
        let state = GameState::new();
        let mut oracle = ScriptedOracle::new().with_picks(&[2, 1]);

        let win = enter(NodeId::WinGame, &state, &mut oracle);
        assert_eq!(win.next, Next::Finish(Outcome::Won));
        assert_eq!(win.narration, vec![WIN_ENDINGS[2].to_string()]);

        let lose = enter(NodeId::EndingBad, &state, &mut oracle);
        assert_eq!(lose.next, Next::Finish(Outcome::Lost));
        assert_eq!(lose.narration, vec![LOSE_ENDINGS[1].to_string()]);
    }

    #[test]
    fn only_terminals_finish() {
        let mut oracle = ScriptedOracle::new();
        let rich = state_with(&[Item::MushroomSlice, Item::Small, Item::MusicNote], 1);
        for node in NodeId::ALL {
            for state in [GameState::new(), rich.clone()] {
                let finishes = matches!(enter(node, &state, &mut oracle).next, Next::Finish(_));
                let terminal = matches!(node, NodeId::WinGame | NodeId::EndingBad);
                assert_eq!(finishes, terminal, "{node}");
            }
        }
    }

    /// Breadth-first walk over (node, state) pairs, both crumb outcomes
    /// included, to prove every node is reachable and both endings exist.
    #[test]
    fn graph_reaches_every_node_and_both_endings() {
        let mut seen_nodes = HashSet::new();
        let mut seen = HashSet::new();
        let mut outcomes = HashSet::new();
        let mut queue = VecDeque::from([(NodeId::Start, GameState::new(), 0usize)]);

        while let Some((node, state, depth)) = queue.pop_front() {
            if depth > 14 || !seen.insert((node, state.clone())) {
                continue;
            }
            seen_nodes.insert(node);

            let entry = enter(node, &state, &mut ScriptedOracle::new());
            let mut after_entry = state.clone();
            for effect in &entry.effects {
                after_entry.apply(*effect);
            }

            let steps = match entry.next.clone() {
                Next::Finish(outcome) => {
                    outcomes.insert(outcome);
                    continue;
                }
                Next::Goto(node) => vec![Step::goto(node)],
                Next::Menu(options) => {
                    let mut steps = Vec::new();
                    for index in 0..options.len() {
                        for crumbs in [true, false] {
                            let mut oracle = ScriptedOracle::new().with_chances(&[crumbs]);
                            steps.push(choose(node, index, &after_entry, &mut oracle));
                        }
                    }
                    steps
                }
            };

            for step in steps {
                let mut next_state = after_entry.clone();
                for effect in &step.effects {
                    next_state.apply(*effect);
                }
                queue.push_back((next_of(&step), next_state, depth + 1));
            }
        }

        assert_eq!(seen_nodes.len(), NodeId::ALL.len());
        assert!(outcomes.contains(&Outcome::Won));
        assert!(outcomes.contains(&Outcome::Lost));
    }
}
