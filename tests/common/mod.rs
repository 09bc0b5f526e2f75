#![allow(dead_code)]

use rand::{CryptoRng, RngCore};
use chaum_blind_rsa::{PublicKey, SecretKey};
use rsa::BigUint;

const P_HEX: &str = "dcd90af1be463632c0d5ea555256a20605af3db667475e190e3af12a34a332\
    4c46a3094062c59fb4b249e0ee6afba8bee14e0276d126c99f4784b23009bf616\
    8ff628ac1486e5ae8e23ce4d362889de4df63109cbd90ef93db5ae64372bfe1c5\
    5f832766f21e94ea3322eb2182f10a891546536ba907ad74b8d72469bea396f3";

const Q_HEX: &str = "f8ba5c89bd068f57234a3cf54a1c89d5b4cd0194f2633ca7c60b91a795a56f\
    a8c8686c0e37b1c4498b851e3420d08bea29f71d195cfbd3671c6ddc49cf4c1db\
    5b478231ea9d91377ffa98fe95685fca20ba4623212b2f2def4da5b281ed0100b\
    651f6db32112e4017d831c0da668768afa7141d45bbc279f1e0f8735d74395b3";

const D_HEX: &str = "4e21356983722aa1adedb084a483401c1127b781aac89eab103e1cfc522154\
    94981d18dd8028566d9d499469c25476358de23821c78a6ae43005e26b394e305\
    1b5ca206aa9968d68cae23b5affd9cbb4cb16d64ac7754b3cdba241b72ad6ddfc\
    000facdb0f0dd03abd4efcfee1730748fcc47b7621182ef8af2eeb7c985349f62\
    ce96ab373d2689baeaea0e28ea7d45f2d605451920ca4ea1f0c08b0f1f6711eaa\
    4b7cca66d58a6b916f9985480f90aca97210685ac7b12d2ec3e30a1c7b97b65a1\
    8d38a93189258aa346bf2bc572cd7e7359605c20221b8909d599ed9d38164c9c4\
    abf396f897b9993c1e805e574d704649985b600fa0ced8e5427071d7049d";

const N_HEX: &str = "d6930820f71fe517bf3259d14d40209b02a5c0d3d61991c731dd7da39f8d69\
    821552e2318d6c9ad897e603887a476ea3162c1205da9ac96f02edf31df049bd5\
    5f142134c17d4382a0e78e275345f165fbe8e49cdca6cf5c726c599dd39e09e75\
    e0f330a33121e73976e4facba9cfa001c28b7c96f8134f9981db6750b43a41710\
    f51da4240fe03106c12acb1e7bb53d75ec7256da3fddd0718b89c365410fce61b\
    c7c99b115fb4c3c318081fa7e1b65a37774e8e50c96e8ce2b2cc6b3b367982366\
    a2bf9924c4bafdb3ff5e722258ab705c76d43e5f1f121b984814e98ea2b2b8725\
    cd9bc905c0bc3d75c2a8db70a7153213c39ae371b2b5dc1dafcb19d6fae9";

fn parse(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("invalid hex")
}

/// A fixed 2048-bit key, so that tests don't pay for key generation.
pub struct Fixture {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
}

pub fn fixture() -> Fixture {
    Fixture {
        n: parse(N_HEX),
        e: BigUint::from(65537u32),
        d: parse(D_HEX),
        p: parse(P_HEX),
        q: parse(Q_HEX),
    }
}

pub fn fixture_keys() -> (PublicKey, SecretKey) {
    let f = fixture();
    let sk = SecretKey::from_components(f.n, f.e, f.d, vec![f.p, f.q]).unwrap();
    let pk = sk.public_key().unwrap();
    (pk, sk)
}

/// Wraps an RNG and counts how many bytes were drawn from it.
pub struct CountingRng<R> {
    pub inner: R,
    pub bytes_drawn: usize,
}

impl<R> CountingRng<R> {
    pub fn new(inner: R) -> Self {
        CountingRng {
            inner,
            bytes_drawn: 0,
        }
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.bytes_drawn += 4;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bytes_drawn += 8;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bytes_drawn += dest.len();
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.bytes_drawn += dest.len();
        self.inner.try_fill_bytes(dest)
    }
}

impl<R: CryptoRng> CryptoRng for CountingRng<R> {}
