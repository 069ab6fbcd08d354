use crate::replica::local_state::Term;
use crate::replica::log_entry::LogEntry;
use crate::replica::peers::ServerId;
use std::fmt;

/// MessageId correlates a reply with the request it answers. It is also the key for the
/// request's resend timer.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(id: u64) -> Self {
        MessageId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out unique message ids for one process lifetime. The starting point is random so that
/// a reply addressed to a previous incarnation of this node is unlikely to match a new request.
pub(crate) struct MessageIdGenerator {
    next: u64,
}

impl MessageIdGenerator {
    pub(crate) fn new() -> Self {
        MessageIdGenerator {
            next: rand::random::<u32>() as u64,
        }
    }

    pub(crate) fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RequestVote {
    pub message_id: MessageId,
    pub term: Term,
    pub candidate_id: ServerId,
    pub last_log_index: u64,
    pub last_log_term: Term,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RequestVoteReply {
    pub message_id: MessageId,
    pub term: Term,
    pub granted: bool,
    pub voter_id: ServerId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppendEntries {
    pub message_id: MessageId,
    pub term: Term,
    pub leader_id: ServerId,
    pub prev_log_index: u64,
    pub prev_log_term: Term,
    /// `None` is a heartbeat.
    pub entry: Option<LogEntry>,
    pub leader_commit: u64,
}

impl AppendEntries {
    pub fn is_heartbeat(&self) -> bool {
        self.entry.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppendEntriesReply {
    pub message_id: MessageId,
    pub term: Term,
    pub success: bool,
    pub follower_id: ServerId,
}

/// Message is anything one server sends another.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    RequestVote(RequestVote),
    RequestVoteReply(RequestVoteReply),
    AppendEntries(AppendEntries),
    AppendEntriesReply(AppendEntriesReply),
}

impl Message {
    pub fn term(&self) -> Term {
        match self {
            Message::RequestVote(m) => m.term,
            Message::RequestVoteReply(m) => m.term,
            Message::AppendEntries(m) => m.term,
            Message::AppendEntriesReply(m) => m.term,
        }
    }

    pub fn message_id(&self) -> MessageId {
        match self {
            Message::RequestVote(m) => m.message_id,
            Message::RequestVoteReply(m) => m.message_id,
            Message::AppendEntries(m) => m.message_id,
            Message::AppendEntriesReply(m) => m.message_id,
        }
    }

    pub fn sender(&self) -> ServerId {
        match self {
            Message::RequestVote(m) => m.candidate_id,
            Message::RequestVoteReply(m) => m.voter_id,
            Message::AppendEntries(m) => m.leader_id,
            Message::AppendEntriesReply(m) => m.follower_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::RequestVote(_) => "RequestVote",
            Message::RequestVoteReply(_) => "RequestVoteReply",
            Message::AppendEntries(_) => "AppendEntries",
            Message::AppendEntriesReply(_) => "AppendEntriesReply",
        }
    }
}

/// An outbound message and who it is for. Produced by the replica, handed to the transport by
/// the actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub target: ServerId,
    pub message: Message,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClientRequest {
    Get { key: String },
    Put { key: String, value: i64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClientReply {
    Value(Option<i64>),
    Written,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientRequestError {
    #[error("Client {0} requests are not implemented yet")]
    NotImplemented(&'static str),
    #[error("Replica actor is dead RIP")]
    ActorExited,
    #[error("Reply doesn't match the request")]
    UnexpectedReply,
}
