//! The `RandSrc` capability set emitted code draws on for `Rand*`
//! routines (spec §4.2 "Rand"), grounded in the `RandSrc` interface
//! `examples/original_source/extra.go` declares (`headerLogics`,
//! the `GetBool`/`GetInt`/`GetUint`/`GetString`/`GetBytes` family) minus
//! its float accessors, which have no counterpart under the tag-based
//! variant this crate targets (see `SPEC_FULL.md` "Format variant
//! decision").
//!
//! This is a Rust-side capability a generated `Rand<Type>` function
//! calls through a caller-supplied implementation; it is not itself
//! emitted.

pub trait RandSrc {
	fn get_bool(&mut self) -> bool;
	fn get_int(&mut self) -> i64;
	fn get_int8(&mut self) -> i8;
	fn get_int16(&mut self) -> i16;
	fn get_int32(&mut self) -> i32;
	fn get_int64(&mut self) -> i64;
	fn get_uint(&mut self) -> u64;
	fn get_uint8(&mut self) -> u8;
	fn get_uint16(&mut self) -> u16;
	fn get_uint32(&mut self) -> u32;
	fn get_uint64(&mut self) -> u64;
	fn get_string(&mut self, max_len: usize) -> String;
	fn get_bytes(&mut self, max_len: usize) -> Vec<u8>;
}

#[cfg(feature = "random")]
pub use std_rand::StdRandSrc;

#[cfg(feature = "random")]
mod std_rand {
	use super::RandSrc;
	use rand::distributions::Alphanumeric;
	use rand::{Rng, RngCore};

	/// A [`RandSrc`] backed by `rand`'s thread-local generator, the same
	/// crate `examples/FuelLabs-fuel-vm/fuel-vm/Cargo.toml` carries for
	/// its own property-test fixtures.
	pub struct StdRandSrc<R: RngCore> {
		rng: R,
	}

	impl<R: RngCore> StdRandSrc<R> {
		pub fn new(rng: R) -> Self {
			Self { rng }
		}
	}

	impl StdRandSrc<rand::rngs::ThreadRng> {
		pub fn thread_local() -> Self {
			Self::new(rand::thread_rng())
		}
	}

	impl<R: RngCore> RandSrc for StdRandSrc<R> {
		fn get_bool(&mut self) -> bool {
			self.rng.gen()
		}
		fn get_int(&mut self) -> i64 {
			self.rng.gen()
		}
		fn get_int8(&mut self) -> i8 {
			self.rng.gen()
		}
		fn get_int16(&mut self) -> i16 {
			self.rng.gen()
		}
		fn get_int32(&mut self) -> i32 {
			self.rng.gen()
		}
		fn get_int64(&mut self) -> i64 {
			self.rng.gen()
		}
		fn get_uint(&mut self) -> u64 {
			self.rng.gen()
		}
		fn get_uint8(&mut self) -> u8 {
			self.rng.gen()
		}
		fn get_uint16(&mut self) -> u16 {
			self.rng.gen()
		}
		fn get_uint32(&mut self) -> u32 {
			self.rng.gen()
		}
		fn get_uint64(&mut self) -> u64 {
			self.rng.gen()
		}
		fn get_string(&mut self, max_len: usize) -> String {
			let len = self.rng.gen_range(0..=max_len);
			(&mut self.rng).sample_iter(&Alphanumeric).take(len).map(char::from).collect()
		}
		fn get_bytes(&mut self, max_len: usize) -> Vec<u8> {
			let len = self.rng.gen_range(0..=max_len);
			let mut bytes = vec![0u8; len];
			self.rng.fill_bytes(&mut bytes);
			bytes
		}
	}

	#[cfg(test)]
	mod tests {
		use super::*;

		#[test]
		fn bounded_accessors_respect_max_len() {
			let mut src = StdRandSrc::thread_local();
			for _ in 0..50 {
				assert!(src.get_string(8).len() <= 8);
				assert!(src.get_bytes(8).len() <= 8);
			}
		}
	}
}
