// Deterministic RNG for tests: SHA-256 over a seed and a block counter.

use sha2::{Digest, Sha256};

use crate::{CryptoRng, RngCore, RngError};

pub(crate) struct Sha256Rng {
    seed: Vec<u8>,
    counter: u64,
    buf: [u8; 32],
    ptr: usize,
}

impl Sha256Rng {
    pub(crate) fn new(seed: &[u8]) -> Self {
        Self { seed: seed.to_vec(), counter: 0, buf: [0u8; 32], ptr: 32 }
    }

    fn refill(&mut self) {
        let mut sh = Sha256::new();
        sh.update(&self.seed);
        sh.update(self.counter.to_le_bytes());
        self.buf.copy_from_slice(&sh.finalize());
        self.counter += 1;
        self.ptr = 0;
    }
}

impl RngCore for Sha256Rng {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.fill_bytes(&mut b);
        u32::from_le_bytes(b)
    }

    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.fill_bytes(&mut b);
        u64::from_le_bytes(b)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for d in dest.iter_mut() {
            if self.ptr == 32 {
                self.refill();
            }
            *d = self.buf[self.ptr];
            self.ptr += 1;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Sha256Rng {}
