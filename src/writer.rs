//! Chain writer: frames a key/value pair into a freshly allocated chain.

use crate::allocator::BlockAllocator;
use crate::bytes::BytesSource;
use crate::chain::{self, Cursor};
use crate::error::CoreError;
use crate::layout::{self, Layout};
use crate::memory::RawMemory;

/// How the value half of an entry should be initialized at creation time.
pub enum ValueInit<'a> {
    /// Write `source`'s bytes into the value region immediately.
    Bytes(&'a dyn BytesSource),
    /// Reserve `len` bytes of value space without writing anything yet;
    /// the caller streams the value in afterwards via a value cursor.
    Reserved(u64),
}

impl ValueInit<'_> {
    fn len(&self) -> u64 {
        match self {
            ValueInit::Bytes(src) => src.size(),
            ValueInit::Reserved(len) => *len,
        }
    }
}

/// Allocates a chain sized for `key` and `value`, initializes its header,
/// and writes the key (and the value, if given as bytes) into the
/// payload.
///
/// Returns the new entry's head address. Returns
/// `Err(CoreError::OutOfMemory)` if the allocator cannot supply enough
/// blocks; the caller is expected to evict and retry, per §4.2's "Return 0
/// from create_entry; caller evicts" error condition.
pub fn create_entry<M, A>(
    mem: &M,
    allocator: &A,
    layout: &Layout,
    hash: u64,
    key: &dyn BytesSource,
    value: ValueInit<'_>,
) -> Result<u64, CoreError>
where
    M: RawMemory,
    A: BlockAllocator,
{
    let key_len = key.size();
    let value_len = value.len();
    let blocks = layout.blocks_for(key_len, value_len);

    let head = allocator
        .allocate_chain(blocks)
        .ok_or(CoreError::OutOfMemory)?;

    chain::set_hash(mem, head, hash);
    chain::set_lru_prev(mem, head, 0);
    chain::set_lru_next(mem, head, 0);
    chain::set_key_length(mem, head, key_len);
    chain::set_value_length(mem, head, value_len);
    mem.put_long_release(chain::entry_lock_addr(head), 0);

    let mut cursor = Cursor::at_head_payload(head, layout);
    write_source(&mut cursor, mem, layout, key);

    let pad = (layout::roundup8(key_len) - key_len) as usize;
    cursor.advance(mem, layout, pad);

    if let ValueInit::Bytes(value_src) = value {
        write_source(&mut cursor, mem, layout, value_src);
    }

    Ok(head)
}

fn write_source<M: RawMemory>(cursor: &mut Cursor, mem: &M, layout: &Layout, src: &dyn BytesSource) {
    if src.has_array() {
        let arr = src.array();
        let off = src.array_offset();
        let len = src.size() as usize;
        cursor.write(mem, layout, &arr[off..off + len]);
    } else {
        let len = src.size();
        for i in 0..len {
            cursor.write_byte(mem, layout, src.get_byte(i));
        }
    }
}
