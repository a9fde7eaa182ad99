use crate::script::graph::{GraphError, ScriptGraph};
use crate::script::node::{AnswerRule, BranchChoice, Edge, PromptNode, StateId};

// ---------------------------------------------------------------------------
// Dataset helpers
// ---------------------------------------------------------------------------

fn rule(trigger: &str, next: u32) -> AnswerRule {
    AnswerRule {
        trigger: trigger.into(),
        edge: Edge::to(StateId::question(next)),
    }
}

fn rule_aside(trigger: &str, tag: &str) -> AnswerRule {
    AnswerRule {
        trigger: trigger.into(),
        edge: Edge::to(StateId::digression(tag)),
    }
}

fn rule_aside_skip(trigger: &str, tag: &str, skip: u32) -> AnswerRule {
    AnswerRule {
        trigger: trigger.into(),
        edge: Edge {
            next: StateId::digression(tag),
            skip: Some(StateId::question(skip)),
        },
    }
}

fn choice(label: &str, next: u32) -> BranchChoice {
    BranchChoice {
        label: label.into(),
        edge: Edge::to(StateId::question(next)),
    }
}

fn question(n: u32, text: &str, rules: Vec<AnswerRule>) -> PromptNode {
    PromptNode {
        id: StateId::question(n),
        text: text.into(),
        rules,
        choices: vec![],
    }
}

fn digression(tag: &str, text: &str, choices: Vec<BranchChoice>) -> PromptNode {
    PromptNode {
        id: StateId::digression(tag),
        text: text.into(),
        rules: vec![],
        choices,
    }
}

// ---------------------------------------------------------------------------
// The outreach script (v4.1)
// ---------------------------------------------------------------------------

/// The built-in hand-authored conversation script.
///
/// Question numbering follows the source script, which has no question 33.
/// Triggers are the anticipated answers; rule order is match order. Several
/// named targets (`lie_response`, `sin_response`, ...) were never authored
/// in the source script and are declared as terminals: reaching one ends
/// the conversation rather than inventing guidance text for it.
pub fn outreach_script() -> Result<ScriptGraph, GraphError> {
    let nodes = vec![
        question(
            1,
            "What do you think happens to us after we die?",
            vec![
                rule_aside_skip("heaven and hell", "heaven_question", 2),
                rule("reincarnation", 2),
                rule("other_theory", 2),
                rule("not sure", 2),
            ],
        ),
        question(
            2,
            "Do you believe there's a God?",
            vec![rule("yes", 3), rule_aside_skip("no", "god_analogy", 3)],
        ),
        question(
            3,
            "Since we know there is a God, it matters how we live. So, do you think you are a good person?",
            vec![rule("yes", 4), rule("no", 7)],
        ),
        question(
            4,
            "Have you ever told a lie?",
            vec![rule("yes", 7), rule_aside("no", "lie_response")],
        ),
        question(
            5,
            "Have you ever used bad language?",
            vec![rule("yes", 7), rule("no", 6)],
        ),
        question(
            6,
            "Have you ever been angry or disrespected someone?",
            vec![rule("yes", 7), rule_aside("no", "sin_response")],
        ),
        question(
            7,
            "We've all done these things and so if God was to judge you based on these things would you be innocent or guilty?",
            vec![rule("guilty", 8), rule_aside("innocent", "innocent_response")],
        ),
        question(
            8,
            "So would we deserve a reward or punishment?",
            vec![rule("punishment", 9), rule_aside("reward", "reward_response")],
        ),
        question(
            9,
            "Does that sound like a place in Heaven or Hell?",
            vec![rule("hell", 10), rule_aside("heaven", "heaven_response")],
        ),
        question(
            10,
            "So how do you think you could avoid your Hell punishment?",
            vec![
                rule("not sure", 11),
                rule_aside("good things", "good_things_response"),
                rule_aside("forgiveness", "forgiveness_response"),
                rule_aside("repent", "repent_response"),
            ],
        ),
        question(
            11,
            "What we need is someone else who would take the punishment for us. If someone took 100% of your Hell punishment, how much would be left for you to take?",
            vec![rule("nothing", 12), rule("zero", 12), rule("0", 12)],
        ),
        question(
            12,
            "So if you have no more Hell punishment, where will you go when you die?",
            vec![rule("heaven", 13), rule_aside("hell", "hell_response")],
        ),
        question(
            13,
            "That was Jesus, that's why he died on the cross, to take the punishment for our sins and he rose from the dead 3 days later.",
            vec![rule("continue", 14)],
        ),
        question(
            14,
            "So if Jesus does that for you, where do you go when you die?",
            vec![rule("heaven", 15), rule_aside("hell", "hell_response_2")],
        ),
        question(
            15,
            "So why would God let you into heaven?",
            vec![
                rule("jesus paid", 16),
                rule("because jesus paid for my sins", 16),
            ],
        ),
        question(
            16,
            "Now he offers this to us as a free gift and all I have to do to receive this free gift is to simply trust that Jesus died on the cross paying for 100% of our Hell punishment.",
            vec![rule("continue", 17)],
        ),
        question(
            17,
            "So if you trust that Jesus has paid for all of your sins now and tomorrow you sin 5 more times and then die, would you go to Heaven or Hell?",
            vec![rule("heaven", 18), rule_aside("hell", "hell_response_3")],
        ),
        question(
            18,
            "and why heaven?",
            vec![
                rule("jesus paid", 19),
                rule("because jesus paid for my sins", 19),
            ],
        ),
        question(
            19,
            "But if you don't trust Jesus paid for your sins, where would you end up?",
            vec![rule("hell", 20), rule_aside("heaven", "gift_response")],
        ),
        question(
            20,
            "..and since you don't want to go to Hell, WHEN should you start trusting that Jesus has paid for your sins?",
            vec![rule("now", 21), rule_aside("before you die", "when_response")],
        ),
        question(
            21,
            "So if you stood before God right now and he asked you \"Why should I let you into Heaven?\" what would you say?",
            vec![
                rule("because jesus paid for my sins", 22),
                rule("jesus paid", 22),
            ],
        ),
        question(
            22,
            "Now, imagine a friend of yours says they are going to heaven because they are a good person, where would they go when they die?",
            vec![rule("hell", 23), rule_aside("heaven", "friend_response")],
        ),
        question(
            23,
            "But another friend comes to you and says \"I'm going to heaven because of two reasons. The first reason is because Jesus died for my sins and the second reason is because I've been a good person.\" Would that person go to Heaven or Hell?",
            vec![rule("hell", 24), rule_aside("heaven", "two_reasons_response")],
        ),
        question(
            24,
            "So, on a scale of 0 -100%, how sure are you that you will go to Heaven when you die?",
            vec![rule("100%", 25), rule("100", 25)],
        ),
        question(
            25,
            "So, does doing good things play any part in getting you to heaven?",
            vec![rule("no", 26), rule_aside("yes", "good_deeds_response")],
        ),
        question(
            26,
            "Do you need to ask for forgiveness to go to Heaven?",
            vec![rule("no", 27), rule_aside("yes", "forgiveness_response_2")],
        ),
        question(
            27,
            "Do you need to be baptized to go to Heaven?",
            vec![rule("no", 28), rule_aside("yes", "baptism_response")],
        ),
        question(
            28,
            "So if these things don't get us to Heaven, why do we do good things?",
            vec![rule("thankful", 29), rule("because we are thankful", 29)],
        ),
        question(
            29,
            "Do you know how you can find out more about Jesus?",
            vec![rule("bible", 30), rule("the bible", 30)],
        ),
        question(
            30,
            "Yep! Do you have a bible and do you read it much?",
            vec![rule("yes", 31), rule_aside("no", "bible_link")],
        ),
        question(
            31,
            "Think of it like this, If you ate food only once a week, would you be very strong?",
            vec![rule("no", 32)],
        ),
        question(
            32,
            "So if the bible is our spiritual food, how often do you think you should read the bible then to be strong spiritually?",
            vec![rule("everyday", 34), rule("every day", 34)],
        ),
        question(
            34,
            "Do you go to church?... what kind of church is it?",
            vec![rule("yes", 35), rule_aside("no", "church_link")],
        ),
        question(
            35,
            "Do they teach the same message we've spoken about here to be saved from our sins?",
            vec![rule("yes", 36), rule_aside("no", "wrong_church")],
        ),
        question(
            36,
            "Also, think of your family and friends, if you asked them, \"What's the reason you'll go to heaven?\" what would their answer be?",
            vec![rule("jesus", 37), rule_aside("good deeds", "family_response")],
        ),
        question(
            37,
            "And since you don't want them to go to hell, how could you help them not to end up there?",
            vec![
                rule("tell them", 38),
                rule("tell them about the gospel", 38),
            ],
        ),
        question(
            38,
            "So let me ask you, What if God asked you this \"Why should I not send you to hell for all the sins you've done\", how would you answer?",
            vec![
                rule("jesus paid", 39),
                rule("because jesus paid for my sins", 39),
            ],
        ),
        question(
            39,
            "Now, remember at the beginning of this chat, what DID you think was getting you to heaven?",
            vec![
                rule_aside("good things", "conclusion"),
                rule_aside("asking for forgiveness", "conclusion"),
            ],
        ),
        // --- Authored digressions ---
        digression(
            "heaven_question",
            "Ask if they think they will go to heaven and why. If they say \"because Jesus died for my sins\", ask: \"Based on how you've lived your life, do you deserve to go to Heaven or Hell after you die?\"",
            vec![
                choice("They answer Heaven", 4),
                choice("They answer Hell", 17),
            ],
        ),
        digression(
            "god_analogy",
            "Ask: \"Would you agree that the building I'm sitting in had a builder, or did it just appear by itself?\" {wait for an answer} \"This building is evidence that it needed a builder. In the same way, when we look at the universe we know it had a beginning therefore it had to have a creator for it. The universe is proof of a universe maker. Buildings need builders, creation needs a creator, agree?\" If they still refuse to believe, continue anyway; if they aren't cooperating at all, wish them well and pass on the socials links.",
            vec![choice("Continue with the questions", 5)],
        ),
        digression(
            "conclusion",
            "This has been a fantastic chat! Do you have any other questions I can help you with? Check us out at needgod.net (press Socials button).",
            vec![],
        ),
    ];

    // Named targets the source script references but never authored.
    // Reaching one ends the conversation.
    let terminal_tags = vec![
        "lie_response",
        "sin_response",
        "innocent_response",
        "reward_response",
        "heaven_response",
        "good_things_response",
        "forgiveness_response",
        "repent_response",
        "hell_response",
        "hell_response_2",
        "hell_response_3",
        "gift_response",
        "when_response",
        "friend_response",
        "two_reasons_response",
        "good_deeds_response",
        "forgiveness_response_2",
        "baptism_response",
        "bible_link",
        "church_link",
        "wrong_church",
        "family_response",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    ScriptGraph::new(nodes, terminal_tags, StateId::question(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_script_validates() {
        let graph = outreach_script().unwrap();
        assert_eq!(graph.entry(), &StateId::question(1));
        // 39 numbered questions minus the missing 33
        assert_eq!(graph.question_count(), 38);
        assert!(!graph.contains(&StateId::question(33)));
    }

    #[test]
    fn opener_skips_question_two_on_heaven_and_hell() {
        let graph = outreach_script().unwrap();
        let node = graph.get(&StateId::question(1)).unwrap();
        let rule = &node.rules[0];
        assert_eq!(rule.trigger, "heaven and hell");
        assert_eq!(rule.edge.next, StateId::digression("heaven_question"));
        assert_eq!(rule.edge.skip, Some(StateId::question(2)));
    }

    #[test]
    fn authored_digressions_carry_branch_choices() {
        let graph = outreach_script().unwrap();
        let node = graph.get(&StateId::digression("heaven_question")).unwrap();
        assert_eq!(node.choices.len(), 2);
        assert_eq!(node.choices[0].edge.next, StateId::question(4));
        assert_eq!(node.choices[1].edge.next, StateId::question(17));

        // conclusion is authored but has no way onward
        let end = graph.get(&StateId::digression("conclusion")).unwrap();
        assert!(end.rules.is_empty() && end.choices.is_empty());
    }

    #[test]
    fn unauthored_digressions_have_no_node() {
        let graph = outreach_script().unwrap();
        for tag in ["lie_response", "sin_response", "wrong_church"] {
            assert!(graph.get(&StateId::digression(tag)).is_none());
        }
    }
}
