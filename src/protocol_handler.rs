// Framing for the Redis serialization protocol: decoding request frames
// from a byte buffer and encoding typed replies into wire bytes.
use bytes::Bytes;
use thiserror::Error as ThisError;

const MSG_SEPARATOR: &[u8; 2] = b"\r\n";
const MSG_SEPARATOR_SIZE: usize = MSG_SEPARATOR.len();

/// A malformed frame. Any of these is fatal to the connection: the
/// handler answers with one generic protocol-error reply and closes.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProtocolError {
    #[error("invalid length prefix")]
    MalformedLength,
    #[error("invalid integer line")]
    MalformedInteger,
    #[error("expected bulk string in array")]
    ExpectedBulkString,
    #[error("expected CRLF after bulk string")]
    MissingTerminator,
    #[error("empty inline command")]
    EmptyInlineCommand,
    #[error("stream ended in the middle of a frame")]
    UnexpectedEof,
}

/// One decoded request frame.
#[derive(Debug, PartialEq)]
pub enum Frame {
    /// Ordered, binary-safe command tokens, the command name first.
    /// Arrays, standalone bulk strings, simple-string lines and inline
    /// commands all decode to this.
    Command(Vec<Bytes>),
    /// An error line sent by the peer.
    Error(String),
    /// An integer line sent by the peer.
    Integer(i64),
}

/// A typed reply, constructed per command and immediately serialized.
#[derive(Debug, PartialEq)]
pub enum Reply {
    SimpleString(String),
    Error(String),
    Integer(i64),
    /// `None` is the null bulk string (`$-1`).
    BulkString(Option<Bytes>),
    Array(Vec<Bytes>),
}

/// Attempt to decode one frame from the front of `buffer`.
///
/// Returns `Ok(None)` while the buffer holds only part of a frame; the
/// caller reads more bytes and retries. On success the frame is
/// returned together with the exact number of bytes it consumed, so
/// the caller can drain and decode pipelined frames back-to-back.
/// `Err` means the bytes can never become a valid frame.
pub fn deserialize_buffer(buffer: &[u8]) -> Result<Option<(Frame, usize)>, ProtocolError> {
    let first_byte = match buffer.first() {
        Some(&byte) => byte,
        None => return Ok(None),
    };

    match first_byte {
        b'*' => deserialize_array(buffer),
        b'$' => match deserialize_bulk(buffer, 0)? {
            Some((payload, consumed)) => {
                // A null bulk string stands in for the empty string.
                let token = payload.unwrap_or_else(Bytes::new);
                Ok(Some((Frame::Command(vec![token]), consumed)))
            }
            None => Ok(None),
        },
        b'+' => match read_line(buffer, 1) {
            Some((line, consumed)) => {
                let token = Bytes::copy_from_slice(line);
                Ok(Some((Frame::Command(vec![token]), consumed)))
            }
            None => Ok(None),
        },
        b'-' => match read_line(buffer, 1) {
            Some((line, consumed)) => {
                let message = String::from_utf8_lossy(line).into_owned();
                Ok(Some((Frame::Error(message), consumed)))
            }
            None => Ok(None),
        },
        b':' => match read_line(buffer, 1) {
            Some((line, consumed)) => {
                let value = parse_ascii_integer(line).ok_or(ProtocolError::MalformedInteger)?;
                Ok(Some((Frame::Integer(value), consumed)))
            }
            None => Ok(None),
        },
        _ => deserialize_inline(buffer),
    }
}

/// `*<count>\r\n` followed by exactly `count` bulk strings. Anything
/// other than a `$` element inside a command array is malformed.
fn deserialize_array(buffer: &[u8]) -> Result<Option<(Frame, usize)>, ProtocolError> {
    let (line, mut next_index) = match read_line(buffer, 1) {
        Some(found) => found,
        None => return Ok(None),
    };

    let length = parse_ascii_integer(line).ok_or(ProtocolError::MalformedLength)?;
    if length < 0 {
        return Err(ProtocolError::MalformedLength);
    }

    let mut tokens: Vec<Bytes> = Vec::new();
    for _ in 0..length {
        match buffer.get(next_index) {
            None => return Ok(None),
            Some(&b'$') => {}
            Some(_) => return Err(ProtocolError::ExpectedBulkString),
        }

        match deserialize_bulk(buffer, next_index)? {
            Some((payload, consumed)) => {
                tokens.push(payload.unwrap_or_else(Bytes::new));
                next_index = consumed;
            }
            None => return Ok(None),
        }
    }

    Ok(Some((Frame::Command(tokens), next_index)))
}

/// Decode one bulk string whose `$` marker sits at `at`. Returns the
/// payload (`None` for the null bulk string) and the absolute index of
/// the first byte past the frame.
fn deserialize_bulk(
    buffer: &[u8],
    at: usize,
) -> Result<Option<(Option<Bytes>, usize)>, ProtocolError> {
    let (line, data_start) = match read_line(buffer, at + 1) {
        Some(found) => found,
        None => return Ok(None),
    };

    let length = parse_ascii_integer(line).ok_or(ProtocolError::MalformedLength)?;
    if length == -1 {
        return Ok(Some((None, data_start)));
    }
    if length < 0 {
        return Err(ProtocolError::MalformedLength);
    }

    let length = length as usize;
    let data_end = data_start + length;
    if buffer.len() < data_end + MSG_SEPARATOR_SIZE {
        return Ok(None);
    }
    if &buffer[data_end..data_end + MSG_SEPARATOR_SIZE] != MSG_SEPARATOR {
        return Err(ProtocolError::MissingTerminator);
    }

    // The payload is raw bytes: no escaping, no text encoding assumed.
    let payload = Bytes::copy_from_slice(&buffer[data_start..data_end]);
    Ok(Some((Some(payload), data_end + MSG_SEPARATOR_SIZE)))
}

/// A bare text line, e.g. `PING` typed into netcat: trimmed and split
/// on runs of whitespace. An all-whitespace line is malformed.
fn deserialize_inline(buffer: &[u8]) -> Result<Option<(Frame, usize)>, ProtocolError> {
    let newline = match buffer.iter().position(|&byte| byte == b'\n') {
        Some(position) => position,
        None => return Ok(None),
    };

    let line = trim_ascii_whitespace(&buffer[..newline]);
    if line.is_empty() {
        return Err(ProtocolError::EmptyInlineCommand);
    }

    let tokens = line
        .split(|byte| byte.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(Bytes::copy_from_slice)
        .collect();

    Ok(Some((Frame::Command(tokens), newline + 1)))
}

/// Serialize one reply into its exact wire bytes.
///
/// Simple-string, error and integer lines must not contain CRLF
/// (caller responsibility); bulk payloads are length-prefixed and
/// exempt.
pub fn serialize_reply(reply: &Reply) -> Vec<u8> {
    match reply {
        Reply::SimpleString(text) => format!("+{}\r\n", text).into_bytes(),
        Reply::Error(message) => format!("-{}\r\n", message).into_bytes(),
        Reply::Integer(value) => format!(":{}\r\n", value).into_bytes(),
        Reply::BulkString(payload) => serialize_bulk(payload.as_ref()),
        Reply::Array(elements) => {
            let mut buffer = format!("*{}\r\n", elements.len()).into_bytes();
            for element in elements {
                buffer.extend(serialize_bulk(Some(element)));
            }
            buffer
        }
    }
}

fn serialize_bulk(payload: Option<&Bytes>) -> Vec<u8> {
    match payload {
        Some(data) => {
            let mut buffer = format!("${}\r\n", data.len()).into_bytes();
            buffer.extend_from_slice(data);
            buffer.extend_from_slice(MSG_SEPARATOR);
            buffer
        }
        None => b"$-1\r\n".to_vec(),
    }
}

/// Find the CRLF-terminated line starting at `start`. Returns the line
/// content and the absolute index just past the terminator, or `None`
/// if the terminator has not arrived yet.
fn read_line(buffer: &[u8], start: usize) -> Option<(&[u8], usize)> {
    if start > buffer.len() {
        return None;
    }

    let position = buffer[start..]
        .windows(MSG_SEPARATOR_SIZE)
        .position(|window| window == MSG_SEPARATOR)?;

    let end = start + position;
    Some((&buffer[start..end], end + MSG_SEPARATOR_SIZE))
}

fn parse_ascii_integer(line: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(line).ok()?;
    text.parse::<i64>().ok()
}

fn trim_ascii_whitespace(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|byte| !byte.is_ascii_whitespace());
    let end = line.iter().rposition(|byte| !byte.is_ascii_whitespace());

    match (start, end) {
        (Some(start), Some(end)) => &line[start..=end],
        _ => &line[0..0],
    }
}
