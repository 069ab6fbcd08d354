use crate::replica::{ServerId, Term};
use tokio::sync::watch;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Follower,
    Candidate,
    Leader,
}

/// What a node looks like from the outside after a role change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoleSnapshot {
    pub role: Role,
    pub term: Term,
    /// The node itself when leader. Whoever we last heard from as follower, if anyone.
    pub leader: Option<ServerId>,
}

pub(super) fn new(initial: RoleSnapshot) -> (RoleChangeNotifier, RoleStateListener) {
    let (snd, rcv) = watch::channel(initial);

    (RoleChangeNotifier { snd }, RoleStateListener { rcv })
}

pub(super) struct RoleChangeNotifier {
    snd: watch::Sender<RoleSnapshot>,
}

impl RoleChangeNotifier {
    pub(super) fn notify(&self, snapshot: RoleSnapshot) {
        // Ignore error: nobody is listening.
        let _ = self.snd.send(snapshot);
    }
}

#[derive(Clone)]
pub struct RoleStateListener {
    rcv: watch::Receiver<RoleSnapshot>,
}

impl RoleStateListener {
    pub fn current(&self) -> RoleSnapshot {
        *self.rcv.borrow()
    }

    /// Waits for the next role change. `None` once the node has shut down.
    pub async fn next(&mut self) -> Option<RoleSnapshot> {
        match self.rcv.changed().await {
            Ok(_) => Some(*self.rcv.borrow()),
            Err(_) => None,
        }
    }

    /// Waits until the node's published state satisfies `predicate`, returning that state.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<RoleSnapshot>
    where
        F: FnMut(&RoleSnapshot) -> bool,
    {
        let current = self.current();
        if predicate(&current) {
            return Some(current);
        }

        while let Some(snapshot) = self.next().await {
            if predicate(&snapshot) {
                return Some(snapshot);
            }
        }
        None
    }
}
