mod byte_order;
mod raw;
mod tile_store;

pub use byte_order::{
    decode_f32s, encode_f32s, read_f32_be, read_f32_le, ByteOrder, BYTES_PER_SAMPLE,
};
pub use raw::{read_fully, RawFloatReader, RawFloatWriter};
pub use tile_store::{TileSource, TileStore};
