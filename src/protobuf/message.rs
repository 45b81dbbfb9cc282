//! The message parser: read a tag, dispatch on the field map, repeat

use crate::combinator::Compose;
use crate::error::{ErrMode, ErrorKind, FeedResult, ParseError};
use crate::primitive::{skip, Skip};
use crate::protobuf::field_map::FieldMap;
use crate::protobuf::varint::{varint64, varint_size, Varint64, VarintSize};
use crate::protobuf::{Tag, WireType};
use crate::Callback;

/// Parse a protobuf message body against `map`
///
/// There is no outer length prefix: the message consumes input until the
/// end-of-stream signal (or until a surrounding
/// [`dynamic_max_bytes`][crate::combinator::dynamic_max_bytes] bound, for
/// submessages). End of stream at a tag boundary is success; mid-field it
/// is a parse error.
///
/// Values land in the destinations registered on the field map; the
/// message's own output carries nothing. Unknown field numbers are skipped
/// according to the wire type in their tag.
pub fn message(map: FieldMap) -> Message {
    Message {
        map,
        tag: varint64(),
        skip_varint: varint64(),
        skip_blob: varint_size().then(skip()),
        skip_fixed: skip(),
        state: MsgState::Tag { started: false },
    }
}

/// Implementation of [`message`]
pub struct Message {
    map: FieldMap,
    tag: Varint64,
    skip_varint: Varint64,
    skip_blob: Compose<VarintSize, Skip>,
    skip_fixed: Skip,
    state: MsgState,
}

#[derive(Clone, Copy)]
enum MsgState {
    /// Reading the next field tag; `started` once any tag byte has arrived
    Tag { started: bool },
    /// Running the value callback of the indexed field-map entry
    Value(usize),
    SkipVarint,
    SkipBlob,
    SkipFixed,
}

impl Message {
    fn next_tag(&mut self) {
        self.state = MsgState::Tag { started: false };
        self.tag.activate(());
    }

    fn dispatch(&mut self, tag: Tag) -> Result<(), ErrMode> {
        if let Some(idx) = self.map.find(tag.field) {
            let entry = &mut self.map.entries[idx];
            if entry.wire_type != tag.wire_type {
                return Err(ParseError::new("message", ErrorKind::Tag).cut());
            }
            entry.value.activate(());
            self.state = MsgState::Value(idx);
        } else {
            match tag.wire_type {
                WireType::Varint => {
                    self.skip_varint.activate(());
                    self.state = MsgState::SkipVarint;
                }
                WireType::LengthDelimited => {
                    self.skip_blob.activate(());
                    self.state = MsgState::SkipBlob;
                }
                WireType::Fixed64 => {
                    self.skip_fixed.activate(8);
                    self.state = MsgState::SkipFixed;
                }
                WireType::Fixed32 => {
                    self.skip_fixed.activate(4);
                    self.state = MsgState::SkipFixed;
                }
            }
        }
        Ok(())
    }
}

impl Callback for Message {
    type Input = ();
    type Output = ();

    fn name(&self) -> &'static str {
        "message"
    }

    fn activate(&mut self, _input: ()) {
        self.next_tag();
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<()> {
        let at_eof = chunk.is_empty();
        loop {
            // an exhausted cursor mid-stream suspends whatever state we are in
            if chunk.is_empty() && !at_eof {
                return Err(ErrMode::Incomplete);
            }
            match self.state {
                MsgState::Tag { started } => {
                    if chunk.is_empty() {
                        return if started {
                            Err(ParseError::new(self.name(), ErrorKind::Eof).cut())
                        } else {
                            Ok(())
                        };
                    }
                    match self.tag.feed(chunk) {
                        Ok(raw) => {
                            let tag = Tag::unpack(raw).map_err(|e| e.cut())?;
                            self.dispatch(tag)?;
                        }
                        Err(ErrMode::Incomplete) => {
                            self.state = MsgState::Tag { started: true };
                            return Err(ErrMode::Incomplete);
                        }
                        Err(e) => return Err(e.cut()),
                    }
                }
                MsgState::Value(idx) => {
                    match self.map.entries[idx].value.feed(chunk) {
                        Ok(()) => self.next_tag(),
                        Err(ErrMode::Incomplete) => return Err(ErrMode::Incomplete),
                        Err(e) => return Err(e.cut()),
                    }
                }
                MsgState::SkipVarint => match self.skip_varint.feed(chunk) {
                    Ok(_) => self.next_tag(),
                    Err(ErrMode::Incomplete) => return Err(ErrMode::Incomplete),
                    Err(e) => return Err(e.cut()),
                },
                MsgState::SkipBlob => match self.skip_blob.feed(chunk) {
                    Ok(_) => self.next_tag(),
                    Err(ErrMode::Incomplete) => return Err(ErrMode::Incomplete),
                    Err(e) => return Err(e.cut()),
                },
                MsgState::SkipFixed => match self.skip_fixed.feed(chunk) {
                    Ok(_) => self.next_tag(),
                    Err(ErrMode::Incomplete) => return Err(ErrMode::Incomplete),
                    Err(e) => return Err(e.cut()),
                },
            }
        }
    }
}
