//! Shared fixtures for handler tests.

use std::sync::Arc;

use crate::adapters::events::InProcessEventBus;
use crate::adapters::memory::{InMemoryMemberDirectory, InMemorySessionRepository};
use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Card, Deck, Session};
use crate::ports::SessionRepository;

pub fn member(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

pub fn card(token: &str) -> Card {
    Card::new(token).unwrap()
}

pub fn sizes_deck() -> Deck {
    Deck::from_tokens("Sizes", &["XS", "S"]).unwrap()
}

pub struct Fixture {
    pub bus: Arc<InProcessEventBus>,
    pub store: Arc<InMemorySessionRepository>,
    pub directory: Arc<InMemoryMemberDirectory>,
}

impl Fixture {
    pub fn new() -> Self {
        let bus = Arc::new(InProcessEventBus::recording());
        Self {
            store: Arc::new(InMemorySessionRepository::new(bus.clone())),
            directory: Arc::new(InMemoryMemberDirectory::new(bus.clone())),
            bus,
        }
    }

    pub fn repository(&self) -> Arc<dyn SessionRepository> {
        self.store.clone()
    }

    /// Stores a running session created by `creator`.
    pub async fn session_by(&self, creator: &str) -> SessionId {
        let (session, events) =
            Session::create("Sprint", "", sizes_deck(), false, member(creator)).unwrap();
        self.store.save(&session, events).await.unwrap();
        *session.id()
    }

    /// Stores a running session with every listed member seated.
    pub async fn session_with(&self, members: &[&str]) -> SessionId {
        let id = self.session_by(members[0]).await;
        for m in &members[1..] {
            let who = member(m);
            self.store
                .modify_exclusively(&id, Box::new(move |s| Ok(vec![s.join(who)])))
                .await
                .unwrap();
        }
        id
    }

    pub async fn get(&self, id: &SessionId) -> Session {
        self.store.get(id).await.unwrap()
    }
}
