use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1 cells, got {width}x{height}")]
    EmptyBoard { width: i32, height: i32 },

    #[error("starting length must be at least 1")]
    ZeroLength,

    #[error("a snake of length {length} does not fit on a board {width} cells wide")]
    SnakeTooLong { length: usize, width: i32 },

    #[error("a {width}x{height} board leaves no room for food next to a snake of length {length}")]
    NoRoomForFood { width: i32, height: i32, length: usize },

    #[error("speed floor must be at least 1 ms")]
    ZeroFloor,

    #[error("speed floor ({floor_ms} ms) is slower than the starting interval ({start_ms} ms)")]
    FloorAboveStart { floor_ms: u64, start_ms: u64 },
}
