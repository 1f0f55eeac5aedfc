//! Pre-auth encoding
//!
//! <https://github.com/paseto-standard/paseto-spec/blob/master/docs/01-Protocol-Versions/Common.md#authentication-padding>
//!
//! This is a low level detail used to build PASETO version implementations.

/// A sink for pre-auth encoded bytes, eg a buffer or a running hash.
pub trait WriteBytes {
    fn write(&mut self, slice: &[u8]);
}

impl<W: WriteBytes + ?Sized> WriteBytes for &mut W {
    fn write(&mut self, slice: &[u8]) {
        (**self).write(slice)
    }
}

impl WriteBytes for Vec<u8> {
    fn write(&mut self, slice: &[u8]) {
        self.extend_from_slice(slice)
    }
}

/// Encode `N` pieces into `out`.
///
/// Each piece is the concatenation of its slices, so `[&[b"v3", b".public."]]`
/// encodes identically to `[&[b"v3.public."]]`.
pub fn pre_auth_encode<const N: usize>(pieces: [&[&[u8]]; N], mut out: impl WriteBytes) {
    let len = N as u64;
    out.write(&len.to_le_bytes());
    for piece in pieces {
        let len: u64 = piece.iter().map(|x| x.len() as u64).sum();
        out.write(&len.to_le_bytes());
        for x in piece {
            out.write(x);
        }
    }
}

/// Encode a list of pieces whose length is only known at runtime.
pub fn encode(pieces: &[&[u8]]) -> Vec<u8> {
    let len = 8 + pieces.iter().map(|x| 8 + x.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.write(&(pieces.len() as u64).to_le_bytes());
    for piece in pieces {
        out.write(&(piece.len() as u64).to_le_bytes());
        out.write(piece);
    }
    out
}
