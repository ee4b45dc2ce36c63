use serde::{Deserialize, Serialize};

use crate::error::InputError;

const INPUT_LEFT: u8 = 0x01;
const INPUT_RIGHT: u8 = 0x02;
const INPUT_THRUST: u8 = 0x04;
const INPUT_FIRE: u8 = 0x08;
const INPUT_HYPERSPACE: u8 = 0x10;
const INPUT_RESERVED_MASK: u8 = 0xE0;

/// Polled control snapshot for one frame.
///
/// `World::update` only steers with `left`, `right` and `thrust`; `fire` and
/// `hyperspace` are acted on by `World::step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    pub hyperspace: bool,
}

impl FrameInput {
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        thrust: false,
        fire: false,
        hyperspace: false,
    };

    #[inline]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { INPUT_LEFT } else { 0 })
        | (if input.right { INPUT_RIGHT } else { 0 })
        | (if input.thrust { INPUT_THRUST } else { 0 })
        | (if input.fire { INPUT_FIRE } else { 0 })
        | (if input.hyperspace { INPUT_HYPERSPACE } else { 0 })
}

/// Lenient decode; reserved bits are ignored.
#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: (byte & INPUT_LEFT) != 0,
        right: (byte & INPUT_RIGHT) != 0,
        thrust: (byte & INPUT_THRUST) != 0,
        fire: (byte & INPUT_FIRE) != 0,
        hyperspace: (byte & INPUT_HYPERSPACE) != 0,
    }
}

pub fn decode_input_byte_strict(byte: u8) -> Result<FrameInput, InputError> {
    if (byte & INPUT_RESERVED_MASK) != 0 {
        return Err(InputError::ReservedBitsSet { byte });
    }
    Ok(decode_input_byte(byte))
}
