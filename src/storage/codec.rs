use crate::replica::{Command, LogEntry, PersistentState, RaftLog, ServerId, Term};
use crate::storage::StorageError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Byte representation of a persisted state record. All integers are big-endian.
///
/// ```text
/// +---+---------------+---+---------------+---------------+----------------...-+
/// |Vrs| Term (8 bytes)|Flg| VotedFor (8)? | Count (8)     | Entries        ... |
/// +---+---------------+---+---------------+---------------+----------------...-+
/// ```
///
/// * `Vrs` - version of the serialized record
/// * `Flg` - 1 if `VotedFor` follows, 0 otherwise
/// * `Count` - number of log entries, including the sentinel
///
/// Each entry is `Term (8) | Tag (1) | payload`, where the payload depends on the tag:
///
/// * `0` NoOp - empty
/// * `1` Get - key
/// * `2` Put - key, value (8, signed)
/// * `3` Config - server list, flag (1), server list if flag is 1
///
/// Strings are a 4 byte length followed by UTF-8 bytes. Server lists are a 4 byte count followed
/// by 8 bytes per server id.
const RECORD_FORMAT_VERSION: u8 = 1;

const TAG_NO_OP: u8 = 0;
const TAG_GET: u8 = 1;
const TAG_PUT: u8 = 2;
const TAG_CONFIG: u8 = 3;

pub(crate) fn encode(state: &PersistentState) -> Bytes {
    let mut buf = BytesMut::with_capacity(32 + state.log.len() * 24);

    buf.put_u8(RECORD_FORMAT_VERSION);
    buf.put_u64(state.current_term.as_u64());
    match state.voted_for {
        None => buf.put_u8(0),
        Some(id) => {
            buf.put_u8(1);
            buf.put_u64(id.as_u64());
        }
    }

    buf.put_u64(state.log.len() as u64);
    for entry in state.log.entries() {
        encode_entry(&mut buf, entry);
    }

    buf.freeze()
}

fn encode_entry(buf: &mut BytesMut, entry: &LogEntry) {
    buf.put_u64(entry.term.as_u64());
    match &entry.command {
        Command::NoOp => buf.put_u8(TAG_NO_OP),
        Command::Get { key } => {
            buf.put_u8(TAG_GET);
            put_string(buf, key);
        }
        Command::Put { key, value } => {
            buf.put_u8(TAG_PUT);
            put_string(buf, key);
            buf.put_i64(*value);
        }
        Command::Config { config, new_config } => {
            buf.put_u8(TAG_CONFIG);
            put_server_list(buf, config);
            match new_config {
                None => buf.put_u8(0),
                Some(new_config) => {
                    buf.put_u8(1);
                    put_server_list(buf, new_config);
                }
            }
        }
    }
}

fn put_string(buf: &mut BytesMut, s: &str) {
    buf.put_u32(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn put_server_list(buf: &mut BytesMut, servers: &[ServerId]) {
    buf.put_u32(servers.len() as u32);
    for id in servers {
        buf.put_u64(id.as_u64());
    }
}

pub(crate) fn decode(mut buf: Bytes) -> Result<PersistentState, StorageError> {
    let version = get_u8(&mut buf)?;
    if version != RECORD_FORMAT_VERSION {
        return Err(corrupt(format!("unknown record version {}", version)));
    }

    let current_term = Term::new(get_u64(&mut buf)?);
    let voted_for = match get_u8(&mut buf)? {
        0 => None,
        1 => Some(get_server_id(&mut buf)?),
        flag => return Err(corrupt(format!("invalid voted_for flag {}", flag))),
    };

    let count = get_u64(&mut buf)?;
    // Every entry is at least 9 bytes. Don't trust `count` for the allocation otherwise.
    if count > (buf.remaining() / 9) as u64 {
        return Err(corrupt(format!("entry count {} exceeds record size", count)));
    }
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        entries.push(decode_entry(&mut buf)?);
    }

    if buf.has_remaining() {
        return Err(corrupt(format!("{} trailing bytes", buf.remaining())));
    }

    let log = RaftLog::from_entries(entries).map_err(|e| corrupt(e.to_string()))?;

    Ok(PersistentState {
        current_term,
        voted_for,
        log,
    })
}

fn decode_entry(buf: &mut Bytes) -> Result<LogEntry, StorageError> {
    let term = Term::new(get_u64(buf)?);
    let command = match get_u8(buf)? {
        TAG_NO_OP => Command::NoOp,
        TAG_GET => Command::Get { key: get_string(buf)? },
        TAG_PUT => {
            let key = get_string(buf)?;
            let value = get_i64(buf)?;
            Command::Put { key, value }
        }
        TAG_CONFIG => {
            let config = get_server_list(buf)?;
            let new_config = match get_u8(buf)? {
                0 => None,
                1 => Some(get_server_list(buf)?),
                flag => return Err(corrupt(format!("invalid new_config flag {}", flag))),
            };
            Command::Config { config, new_config }
        }
        tag => return Err(corrupt(format!("unknown command tag {}", tag))),
    };

    Ok(LogEntry::new(term, command))
}

fn get_u8(buf: &mut Bytes) -> Result<u8, StorageError> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8())
}

fn get_u32(buf: &mut Bytes) -> Result<u32, StorageError> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_u32())
}

fn get_u64(buf: &mut Bytes) -> Result<u64, StorageError> {
    ensure_remaining(buf, 8)?;
    Ok(buf.get_u64())
}

fn get_i64(buf: &mut Bytes) -> Result<i64, StorageError> {
    ensure_remaining(buf, 8)?;
    Ok(buf.get_i64())
}

fn get_server_id(buf: &mut Bytes) -> Result<ServerId, StorageError> {
    Ok(ServerId::new(get_u64(buf)? as usize))
}

fn get_string(buf: &mut Bytes) -> Result<String, StorageError> {
    let len = get_u32(buf)? as usize;
    ensure_remaining(buf, len)?;
    let raw = buf.split_to(len);

    String::from_utf8(raw.to_vec()).map_err(|e| corrupt(format!("key is not UTF-8: {}", e)))
}

fn get_server_list(buf: &mut Bytes) -> Result<Vec<ServerId>, StorageError> {
    let count = get_u32(buf)? as usize;
    ensure_remaining(buf, count * 8)?;

    let mut servers = Vec::with_capacity(count);
    for _ in 0..count {
        servers.push(get_server_id(buf)?);
    }
    Ok(servers)
}

fn ensure_remaining(buf: &Bytes, needed: usize) -> Result<(), StorageError> {
    if buf.remaining() < needed {
        return Err(corrupt(format!(
            "record truncated: needed {} more bytes, found {}",
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

fn corrupt(reason: String) -> StorageError {
    StorageError::Corrupt(reason)
}
