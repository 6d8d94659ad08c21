//! Integration tests for the session command surface.
//!
//! Drives a fully wired `Engine` through the public handlers and checks the
//! round rules, the all-or-nothing mutation guarantee and the event stream.

use std::sync::Arc;
use std::time::Duration;

use planning_poker::adapters::InProcessEventBus;
use planning_poker::application::handlers::{
    CastVoteCommand, CreateSessionCommand, JoinSessionCommand, LeaveSessionCommand,
    RestartRoundCommand, RevealVotesCommand, UpdateSessionCommand, WithdrawVoteCommand,
};
use planning_poker::application::Engine;
use planning_poker::config::ConvergenceConfig;
use planning_poker::domain::foundation::{MemberId, RoundState, SessionId};
use planning_poker::domain::session::{Card, Deck, SessionChange, SessionError, SessionUpdated, SESSION_UPDATED};
use planning_poker::domain::state::project;
use planning_poker::ports::SessionRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn member(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

fn card(token: &str) -> Card {
    Card::new(token).unwrap()
}

fn engine() -> (Arc<InProcessEventBus>, Engine) {
    let bus = Arc::new(InProcessEventBus::recording());
    let engine = Engine::with_bus(
        bus.clone(),
        &ConvergenceConfig {
            push_enabled: false,
            ..Default::default()
        },
    );
    (bus, engine)
}

async fn create(engine: &Engine, creator: &str, everyone_can_reveal: bool) -> SessionId {
    let session = engine
        .create
        .handle(CreateSessionCommand {
            creator: member(creator),
            name: "Sprint 12".to_string(),
            ticket_url: String::new(),
            deck: Some(Deck::from_tokens("Sizes", &["XS", "S"]).unwrap()),
            everyone_can_reveal,
        })
        .await
        .unwrap();
    *session.id()
}

async fn join(engine: &Engine, id: SessionId, who: &str) {
    engine
        .join
        .handle(JoinSessionCommand {
            session_id: id,
            member_id: member(who),
        })
        .await
        .unwrap();
}

async fn vote(engine: &Engine, id: SessionId, who: &str, token: &str) -> Result<(), SessionError> {
    engine
        .vote
        .handle(CastVoteCommand {
            session_id: id,
            member_id: member(who),
            card: card(token),
        })
        .await
        .map(|_| ())
}

async fn reveal(engine: &Engine, id: SessionId, who: &str) -> Result<(), SessionError> {
    engine
        .reveal
        .handle(RevealVotesCommand {
            session_id: id,
            member_id: member(who),
        })
        .await
        .map(|_| ())
}

// =============================================================================
// Round rules
// =============================================================================

#[tokio::test]
async fn reveal_round_end_to_end() {
    let (_, engine) = engine();
    let id = create(&engine, "a", false).await;
    join(&engine, id, "b").await;
    vote(&engine, id, "a", "XS").await.unwrap();
    vote(&engine, id, "b", "S").await.unwrap();

    assert_eq!(
        reveal(&engine, id, "b").await.unwrap_err(),
        SessionError::Forbidden(member("b"))
    );
    reveal(&engine, id, "a").await.unwrap();

    let session = engine.store.get(&id).await.unwrap();
    assert_eq!(session.state(), RoundState::Revealed);
    let view = project(&member("b"), &session, &[]);
    assert_eq!(view.player(&member("a")).unwrap().voted_card, Some(card("XS")));
    assert_eq!(view.voted_card, Some(card("S")));
}

#[tokio::test]
async fn votes_are_closed_until_restart() {
    let (_, engine) = engine();
    let id = create(&engine, "a", false).await;
    reveal(&engine, id, "a").await.unwrap();

    assert_eq!(
        vote(&engine, id, "a", "S").await.unwrap_err(),
        SessionError::SessionFinished
    );
    assert_eq!(
        engine
            .unvote
            .handle(WithdrawVoteCommand {
                session_id: id,
                member_id: member("a"),
            })
            .await
            .unwrap_err(),
        SessionError::SessionFinished
    );

    engine
        .restart
        .handle(RestartRoundCommand {
            session_id: id,
            member_id: member("a"),
        })
        .await
        .unwrap();
    vote(&engine, id, "a", "S").await.unwrap();
}

#[tokio::test]
async fn everyone_can_reveal_lets_any_member_end_round() {
    let (_, engine) = engine();
    let id = create(&engine, "a", true).await;
    join(&engine, id, "b").await;

    reveal(&engine, id, "b").await.unwrap();
}

#[tokio::test]
async fn leaver_vote_survives_until_restart() {
    let (_, engine) = engine();
    let id = create(&engine, "a", false).await;
    join(&engine, id, "b").await;
    vote(&engine, id, "b", "S").await.unwrap();
    engine
        .leave
        .handle(LeaveSessionCommand {
            session_id: id,
            member_id: member("b"),
        })
        .await
        .unwrap();
    reveal(&engine, id, "a").await.unwrap();

    let revealed = engine.store.get(&id).await.unwrap();
    let view = project(&member("a"), &revealed, &[]);
    assert_eq!(view.player(&member("b")).unwrap().voted_card, Some(card("S")));
    assert!(!view.player(&member("b")).unwrap().active);

    let restarted = engine
        .restart
        .handle(RestartRoundCommand {
            session_id: id,
            member_id: member("a"),
        })
        .await
        .unwrap();
    assert!(!restarted.is_member(&member("b")));
}

#[tokio::test]
async fn commands_from_strangers_are_rejected() {
    let (_, engine) = engine();
    let id = create(&engine, "a", false).await;
    let stranger = SessionError::NotAMember(member("z"));

    assert_eq!(vote(&engine, id, "z", "S").await.unwrap_err(), stranger);
    assert_eq!(reveal(&engine, id, "z").await.unwrap_err(), stranger);
    assert_eq!(
        engine
            .update
            .handle(UpdateSessionCommand {
                session_id: id,
                member_id: member("z"),
                name: "hijacked".to_string(),
                ticket_url: String::new(),
            })
            .await
            .unwrap_err(),
        stranger
    );
}

// =============================================================================
// Store guarantees
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_are_all_kept() {
    let (_, engine) = engine();
    let engine = Arc::new(engine);
    let id = create(&engine, "a", false).await;
    let voters: Vec<String> = (0..16).map(|i| format!("voter-{}", i)).collect();
    for voter in &voters {
        join(&engine, id, voter).await;
    }

    let mut tasks = Vec::new();
    for (i, voter) in voters.iter().enumerate() {
        let engine = Arc::clone(&engine);
        let voter = voter.clone();
        let token = if i % 2 == 0 { "XS" } else { "S" };
        tasks.push(tokio::spawn(async move {
            vote(&engine, id, &voter, token).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let session = engine.store.get(&id).await.unwrap();
    for (i, voter) in voters.iter().enumerate() {
        let expected = if i % 2 == 0 { "XS" } else { "S" };
        assert_eq!(
            session.player(&member(voter)).unwrap().voted_card(),
            Some(&card(expected))
        );
    }
}

#[tokio::test]
async fn rejected_command_leaves_session_and_events_untouched() {
    let (bus, engine) = engine();
    let id = create(&engine, "a", false).await;
    let before = engine.store.get(&id).await.unwrap();
    let events_before = bus.event_count();

    assert_eq!(
        vote(&engine, id, "a", "XL").await.unwrap_err(),
        SessionError::UnknownCard(card("XL"))
    );

    assert_eq!(engine.store.get(&id).await.unwrap(), before);
    assert_eq!(bus.event_count(), events_before);
}

#[tokio::test]
async fn events_follow_mutation_order() {
    let (bus, engine) = engine();
    let id = create(&engine, "a", false).await;
    join(&engine, id, "b").await;
    vote(&engine, id, "b", "S").await.unwrap();
    reveal(&engine, id, "a").await.unwrap();

    let changes: Vec<SessionChange> = bus
        .events_of_type(SESSION_UPDATED)
        .iter()
        .filter(|e| e.aggregate_id == id.to_string())
        .map(|e| e.payload_as::<SessionUpdated>().unwrap().change)
        .collect();

    assert_eq!(
        changes,
        vec![
            SessionChange::Created,
            SessionChange::Joined,
            SessionChange::Joined,
            SessionChange::Voted,
            SessionChange::Revealed,
        ]
    );
    let last = bus.events_of_type(SESSION_UPDATED).pop().unwrap();
    let last: SessionUpdated = last.payload_as().unwrap();
    assert_eq!(&last.version, engine.store.get(&id).await.unwrap().version());
}

#[tokio::test]
async fn sessions_do_not_block_each_other() {
    let (_, engine) = engine();
    let first = create(&engine, "a", false).await;
    let second = create(&engine, "b", false).await;

    tokio::time::timeout(Duration::from_millis(500), async {
        vote(&engine, first, "a", "S").await.unwrap();
        vote(&engine, second, "b", "XS").await.unwrap();
    })
    .await
    .unwrap();

    assert_ne!(first, second);
}
