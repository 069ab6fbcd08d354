use crate::grpc::{
    proto_client_result, proto_envelope, proto_log_entry, ProtoAppendEntries, ProtoAppendEntriesReply,
    ProtoClientError, ProtoClientResult, ProtoClientValue, ProtoClientWritten, ProtoConfig, ProtoEnvelope, ProtoGet,
    ProtoLogEntry, ProtoNoOp, ProtoPut, ProtoRequestVote, ProtoRequestVoteReply, ProtoServerList,
};
use crate::replica::{
    AppendEntries, AppendEntriesReply, ClientReply, ClientRequestError, Command, LogEntry, Message, MessageId,
    RequestVote, RequestVoteReply, ServerId, Term,
};
use std::convert::TryFrom;
use tonic::Status;

pub(crate) fn envelope_from_message(message: Message) -> ProtoEnvelope {
    let inner = match message {
        Message::RequestVote(m) => proto_envelope::Message::RequestVote(ProtoRequestVote {
            message_id: m.message_id.as_u64(),
            term: m.term.as_u64(),
            candidate_id: m.candidate_id.as_u64(),
            last_log_index: m.last_log_index,
            last_log_term: m.last_log_term.as_u64(),
        }),
        Message::RequestVoteReply(m) => proto_envelope::Message::RequestVoteReply(ProtoRequestVoteReply {
            message_id: m.message_id.as_u64(),
            term: m.term.as_u64(),
            granted: m.granted,
            voter_id: m.voter_id.as_u64(),
        }),
        Message::AppendEntries(m) => proto_envelope::Message::AppendEntries(ProtoAppendEntries {
            message_id: m.message_id.as_u64(),
            term: m.term.as_u64(),
            leader_id: m.leader_id.as_u64(),
            prev_log_index: m.prev_log_index,
            prev_log_term: m.prev_log_term.as_u64(),
            entry: m.entry.map(proto_from_log_entry),
            leader_commit: m.leader_commit,
        }),
        Message::AppendEntriesReply(m) => proto_envelope::Message::AppendEntriesReply(ProtoAppendEntriesReply {
            message_id: m.message_id.as_u64(),
            term: m.term.as_u64(),
            success: m.success,
            follower_id: m.follower_id.as_u64(),
        }),
    };

    ProtoEnvelope { message: Some(inner) }
}

pub(crate) fn message_from_envelope(envelope: ProtoEnvelope) -> Result<Message, Status> {
    let inner = envelope
        .message
        .ok_or_else(|| Status::invalid_argument("Envelope is empty"))?;

    let message = match inner {
        proto_envelope::Message::RequestVote(m) => Message::RequestVote(RequestVote {
            message_id: MessageId::new(m.message_id),
            term: Term::new(m.term),
            candidate_id: server_id(m.candidate_id)?,
            last_log_index: m.last_log_index,
            last_log_term: Term::new(m.last_log_term),
        }),
        proto_envelope::Message::RequestVoteReply(m) => Message::RequestVoteReply(RequestVoteReply {
            message_id: MessageId::new(m.message_id),
            term: Term::new(m.term),
            granted: m.granted,
            voter_id: server_id(m.voter_id)?,
        }),
        proto_envelope::Message::AppendEntries(m) => Message::AppendEntries(AppendEntries {
            message_id: MessageId::new(m.message_id),
            term: Term::new(m.term),
            leader_id: server_id(m.leader_id)?,
            prev_log_index: m.prev_log_index,
            prev_log_term: Term::new(m.prev_log_term),
            entry: m.entry.map(log_entry_from_proto).transpose()?,
            leader_commit: m.leader_commit,
        }),
        proto_envelope::Message::AppendEntriesReply(m) => Message::AppendEntriesReply(AppendEntriesReply {
            message_id: MessageId::new(m.message_id),
            term: Term::new(m.term),
            success: m.success,
            follower_id: server_id(m.follower_id)?,
        }),
    };

    Ok(message)
}

fn proto_from_log_entry(entry: LogEntry) -> ProtoLogEntry {
    let command = match entry.command {
        Command::NoOp => proto_log_entry::Command::NoOp(ProtoNoOp {}),
        Command::Get { key } => proto_log_entry::Command::Get(ProtoGet { key }),
        Command::Put { key, value } => proto_log_entry::Command::Put(ProtoPut { key, value }),
        Command::Config { config, new_config } => proto_log_entry::Command::Config(ProtoConfig {
            config: config.iter().map(ServerId::as_u64).collect(),
            new_config: new_config.map(|servers| ProtoServerList {
                servers: servers.iter().map(ServerId::as_u64).collect(),
            }),
        }),
    };

    ProtoLogEntry {
        term: entry.term.as_u64(),
        command: Some(command),
    }
}

fn log_entry_from_proto(entry: ProtoLogEntry) -> Result<LogEntry, Status> {
    let command = match entry.command {
        None => return Err(Status::invalid_argument("Log entry has no command")),
        Some(proto_log_entry::Command::NoOp(_)) => Command::NoOp,
        Some(proto_log_entry::Command::Get(get)) => Command::Get { key: get.key },
        Some(proto_log_entry::Command::Put(put)) => Command::Put {
            key: put.key,
            value: put.value,
        },
        Some(proto_log_entry::Command::Config(config)) => Command::Config {
            config: server_ids(config.config)?,
            new_config: config.new_config.map(|list| server_ids(list.servers)).transpose()?,
        },
    };

    Ok(LogEntry::new(Term::new(entry.term), command))
}

fn server_id(id: u64) -> Result<ServerId, Status> {
    usize::try_from(id)
        .map(ServerId::new)
        .map_err(|_| Status::invalid_argument(format!("Server id {} out of range", id)))
}

fn server_ids(ids: Vec<u64>) -> Result<Vec<ServerId>, Status> {
    ids.into_iter().map(server_id).collect()
}

pub(crate) fn client_result(result: Result<ClientReply, ClientRequestError>) -> ProtoClientResult {
    let inner = match result {
        Ok(ClientReply::Value(value)) => proto_client_result::Result::Value(ProtoClientValue {
            found: value.is_some(),
            value: value.unwrap_or_default(),
        }),
        Ok(ClientReply::Written) => proto_client_result::Result::Written(ProtoClientWritten {}),
        Err(e) => proto_client_result::Result::Err(ProtoClientError { message: e.to_string() }),
    };

    ProtoClientResult { result: Some(inner) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_entries_with_config_entry_survives_the_wire() {
        let message = Message::AppendEntries(AppendEntries {
            message_id: MessageId::new(99),
            term: Term::new(4),
            leader_id: ServerId::new(2),
            prev_log_index: 10,
            prev_log_term: Term::new(3),
            entry: Some(LogEntry::new(
                Term::new(4),
                Command::Config {
                    config: vec![ServerId::new(0), ServerId::new(1)],
                    new_config: None,
                },
            )),
            leader_commit: 9,
        });

        let decoded = message_from_envelope(envelope_from_message(message.clone())).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn rejects_empty_envelopes_and_entries() {
        let empty = ProtoEnvelope { message: None };
        assert_eq!(
            message_from_envelope(empty).unwrap_err().code(),
            tonic::Code::InvalidArgument
        );

        let commandless = ProtoEnvelope {
            message: Some(proto_envelope::Message::AppendEntries(ProtoAppendEntries {
                message_id: 1,
                term: 1,
                leader_id: 0,
                prev_log_index: 0,
                prev_log_term: 0,
                entry: Some(ProtoLogEntry { term: 1, command: None }),
                leader_commit: 0,
            })),
        };
        assert_eq!(
            message_from_envelope(commandless).unwrap_err().code(),
            tonic::Code::InvalidArgument
        );
    }

    #[test]
    fn client_results() {
        let not_found = client_result(Ok(ClientReply::Value(None)));
        assert_eq!(
            not_found.result,
            Some(proto_client_result::Result::Value(ProtoClientValue {
                found: false,
                value: 0
            }))
        );

        let rejected = client_result(Err(ClientRequestError::NotImplemented("Put")));
        match rejected.result {
            Some(proto_client_result::Result::Err(err)) => assert!(err.message.contains("Put")),
            other => panic!("Unexpected result {:?}", other),
        }
    }
}
