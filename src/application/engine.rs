//! Engine - in-process composition of the session engine.
//!
//! Builds the event bus, stores and push channels, subscribes the
//! listeners, and exposes one handler per operation.

use std::sync::Arc;

use crate::adapters::{InMemoryMemberDirectory, InMemorySessionRepository, InProcessEventBus, PlayerChannels};
use crate::config::ConvergenceConfig;
use crate::domain::member::MEMBER_UPDATED;
use crate::domain::session::SESSION_UPDATED;
use crate::ports::{EventSubscriber, MemberDirectory, SessionRepository, StatePublisher};

use super::handlers::convergence::{
    AwaitChangeHandler, MemberRenameListener, StateBroadcaster, VersionWatchers,
};
use super::handlers::session::{
    CastVoteHandler, CreateSessionHandler, JoinSessionHandler, LeaveSessionHandler,
    RestartRoundHandler, RevealVotesHandler, UpdateSessionHandler, WithdrawVoteHandler,
};

/// A fully wired session engine.
///
/// # Example
///
/// ```ignore
/// let engine = Engine::new(&config.convergence);
/// let alice = engine.directory.register("Alice").await?;
/// let session = engine.create.handle(CreateSessionCommand { .. }).await?;
/// let mut rx = engine.channels.connect(session.id(), &alice.id).await;
/// ```
pub struct Engine {
    pub bus: Arc<InProcessEventBus>,
    pub store: Arc<InMemorySessionRepository>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub channels: Arc<PlayerChannels>,
    pub watchers: Arc<VersionWatchers>,

    pub create: CreateSessionHandler,
    pub update: UpdateSessionHandler,
    pub join: JoinSessionHandler,
    pub leave: LeaveSessionHandler,
    pub vote: CastVoteHandler,
    pub unvote: WithdrawVoteHandler,
    pub reveal: RevealVotesHandler,
    pub restart: RestartRoundHandler,
    pub await_change: AwaitChangeHandler,
}

impl Engine {
    pub fn new(config: &ConvergenceConfig) -> Self {
        Self::with_bus(Arc::new(InProcessEventBus::new()), config)
    }

    /// Wires the engine around a caller-supplied bus.
    pub fn with_bus(bus: Arc<InProcessEventBus>, config: &ConvergenceConfig) -> Self {
        let store = Arc::new(InMemorySessionRepository::new(bus.clone()));
        let directory = Arc::new(InMemoryMemberDirectory::new(bus.clone()));
        let channels = Arc::new(PlayerChannels::with_default_capacity());
        let watchers = Arc::new(VersionWatchers::new());

        let repository: Arc<dyn SessionRepository> = store.clone();
        let members: Arc<dyn MemberDirectory> = directory.clone();

        bus.subscribe(SESSION_UPDATED, watchers.clone());
        bus.subscribe(
            MEMBER_UPDATED,
            Arc::new(MemberRenameListener::new(repository.clone())),
        );
        if config.push_enabled {
            let publisher: Arc<dyn StatePublisher> = channels.clone();
            bus.subscribe(
                SESSION_UPDATED,
                Arc::new(StateBroadcaster::new(
                    repository.clone(),
                    members.clone(),
                    publisher,
                )),
            );
        }
        tracing::debug!(
            poll_interval_ms = config.poll_interval_ms,
            max_wait_ms = config.max_wait_ms,
            push_enabled = config.push_enabled,
            "Engine wired"
        );

        Self {
            create: CreateSessionHandler::new(repository.clone()),
            update: UpdateSessionHandler::new(repository.clone()),
            join: JoinSessionHandler::new(repository.clone()),
            leave: LeaveSessionHandler::new(repository.clone()),
            vote: CastVoteHandler::new(repository.clone()),
            unvote: WithdrawVoteHandler::new(repository.clone()),
            reveal: RevealVotesHandler::new(repository.clone()),
            restart: RestartRoundHandler::new(repository.clone()),
            await_change: AwaitChangeHandler::new(repository, members, watchers.clone(), config),
            bus,
            store,
            directory,
            channels,
            watchers,
        }
    }
}
