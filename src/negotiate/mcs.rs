//! Channel widths and VHT/HE MCS map arithmetic.

use std::fmt;

/// Operating channel width, ordered from narrowest to widest.
///
/// Stored in configuration items as its integer [`code`](Self::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelWidth {
    Mhz20 = 0,
    Mhz40 = 1,
    Mhz80 = 2,
    Mhz160 = 3,
    Mhz80P80 = 4,
}

impl ChannelWidth {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Mhz20),
            1 => Some(Self::Mhz40),
            2 => Some(Self::Mhz80),
            3 => Some(Self::Mhz160),
            4 => Some(Self::Mhz80P80),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Highest long-GI VHT data rate of one spatial stream at this width,
    /// in Mbps (MCS 8 at 20 MHz, MCS 9 otherwise).
    pub fn stream_rate_mbps(self) -> u32 {
        match self {
            Self::Mhz20 => 78,
            Self::Mhz40 => 180,
            Self::Mhz80 => 390,
            Self::Mhz160 | Self::Mhz80P80 => 780,
        }
    }
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mhz20 => "20MHz",
            Self::Mhz40 => "40MHz",
            Self::Mhz80 => "80MHz",
            Self::Mhz160 => "160MHz",
            Self::Mhz80P80 => "80+80MHz",
        })
    }
}

/// Per-stream MCS support value meaning "stream not supported".
pub const MCS_NOT_SUPPORTED: u32 = 3;

/// Map with every stream unsupported.
pub const MCS_MAP_NONE: u16 = 0xffff;

/// Streams encoded in one 16-bit map.
pub const MAX_STREAMS: u32 = 8;

/// Two-bit support value of `stream` (0-based).
pub fn stream_support(map: u16, stream: u32) -> u32 {
    u32::from(map >> (2 * stream)) & 0b11
}

/// Lower of two per-stream support values, "not supported" being lowest.
pub fn min_support(a: u32, b: u32) -> u32 {
    if rank(a) <= rank(b) {
        a
    } else {
        b
    }
}

fn rank(support: u32) -> u32 {
    match support & 0b11 {
        MCS_NOT_SUPPORTED => 0,
        v => v + 1,
    }
}

/// Clamp a requested map against hardware and a spatial stream limit.
///
/// Each of the first `nss` streams gets the lower of the requested and
/// hardware support, every stream past `nss` becomes unsupported.
pub fn clamp_map(requested: u16, hardware: u16, nss: u32) -> u16 {
    (0..MAX_STREAMS).fold(0u16, |map, stream| {
        let support = if stream < nss {
            min_support(stream_support(requested, stream), stream_support(hardware, stream))
        } else {
            MCS_NOT_SUPPORTED
        };
        map | ((support as u16) << (2 * stream))
    })
}

/// Number of leading supported streams in `map`.
pub fn supported_streams(map: u16) -> u32 {
    (0..MAX_STREAMS)
        .take_while(|&s| stream_support(map, s) != MCS_NOT_SUPPORTED)
        .count() as u32
}
