//! BN254 points, proofs and verifying keys as the `uint256` words a Solidity
//! verifier takes, plus the checks needed to lift such words back into curve
//! points.
use ark_ec::AffineRepr;
use ark_ff::{BigInteger256, PrimeField, Zero};
use ethers_core::types::U256;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};

use crate::signals::Signal;

/// A point could not be lifted back onto BN254.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointError {
    #[error("coordinate is not a canonical field element")]
    NonCanonical,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime order subgroup")]
    WrongSubgroup,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Inputs(pub Vec<U256>);

impl From<&[Fr]> for Inputs {
    fn from(src: &[Fr]) -> Self {
        let els = src.iter().map(|point| point_to_u256(*point)).collect();

        Self(els)
    }
}

impl Inputs {
    /// Lifts the words into the scalar field, failing on anything >= r.
    pub fn to_scalars(&self) -> Result<Vec<Fr>, PointError> {
        self.0.iter().map(|w| u256_to_point(*w)).collect()
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct G1 {
    pub x: U256,
    pub y: U256,
}

impl TryFrom<G1> for G1Affine {
    type Error = PointError;

    fn try_from(src: G1) -> Result<G1Affine, PointError> {
        let x: Fq = u256_to_point(src.x)?;
        let y: Fq = u256_to_point(src.y)?;
        if x.is_zero() && y.is_zero() {
            return Ok(G1Affine::zero());
        }
        let p = G1Affine::new_unchecked(x, y);
        if !p.is_on_curve() {
            return Err(PointError::NotOnCurve);
        }
        if !p.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PointError::WrongSubgroup);
        }
        Ok(p)
    }
}

type G1Tup = (U256, U256);

impl G1 {
    pub fn as_tuple(&self) -> (U256, U256) {
        (self.x, self.y)
    }
}

impl From<&G1Affine> for G1 {
    fn from(p: &G1Affine) -> Self {
        match p.xy() {
            Some((x, y)) => Self {
                x: point_to_u256(*x),
                y: point_to_u256(*y),
            },
            None => Self::default(),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct G2 {
    pub x: [U256; 2],
    pub y: [U256; 2],
}

impl TryFrom<G2> for G2Affine {
    type Error = PointError;

    fn try_from(src: G2) -> Result<G2Affine, PointError> {
        let x = Fq2::new(u256_to_point(src.x[0])?, u256_to_point(src.x[1])?);
        let y = Fq2::new(u256_to_point(src.y[0])?, u256_to_point(src.y[1])?);
        if x.is_zero() && y.is_zero() {
            return Ok(G2Affine::zero());
        }
        let p = G2Affine::new_unchecked(x, y);
        if !p.is_on_curve() {
            return Err(PointError::NotOnCurve);
        }
        if !p.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PointError::WrongSubgroup);
        }
        Ok(p)
    }
}

type G2Tup = ([U256; 2], [U256; 2]);

impl G2 {
    // the c1 limb goes first on the wire
    pub fn as_tuple(&self) -> G2Tup {
        ([self.x[1], self.x[0]], [self.y[1], self.y[0]])
    }

    /// Inverse of [`G2::as_tuple`]: reads a c1-first pair as it appears in calldata.
    pub fn from_tuple(x: [U256; 2], y: [U256; 2]) -> Self {
        Self {
            x: [x[1], x[0]],
            y: [y[1], y[0]],
        }
    }
}

impl From<&G2Affine> for G2 {
    fn from(p: &G2Affine) -> Self {
        match p.xy() {
            Some((x, y)) => Self {
                x: [point_to_u256(x.c0), point_to_u256(x.c1)],
                y: [point_to_u256(y.c0), point_to_u256(y.c1)],
            },
            None => Self::default(),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Proof {
    pub a: G1,
    pub b: G2,
    pub c: G1,
}

impl Proof {
    pub fn as_tuple(&self) -> (G1Tup, G2Tup, G1Tup) {
        (self.a.as_tuple(), self.b.as_tuple(), self.c.as_tuple())
    }
}

impl From<&ark_groth16::Proof<Bn254>> for Proof {
    fn from(proof: &ark_groth16::Proof<Bn254>) -> Self {
        Self {
            a: G1::from(&proof.a),
            b: G2::from(&proof.b),
            c: G1::from(&proof.c),
        }
    }
}

impl TryFrom<Proof> for ark_groth16::Proof<Bn254> {
    type Error = PointError;

    fn try_from(src: Proof) -> Result<ark_groth16::Proof<Bn254>, PointError> {
        Ok(ark_groth16::Proof {
            a: src.a.try_into()?,
            b: src.b.try_into()?,
            c: src.c.try_into()?,
        })
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VerifyingKey {
    pub alpha1: G1,
    pub beta2: G2,
    pub gamma2: G2,
    pub delta2: G2,
    pub ic: Vec<G1>,
}

/// A snarkjs `verification_key.json` document was missing a field or held a
/// non-integer coordinate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed verification key field `{0}`")]
pub struct VerificationKeyError(pub String);

impl VerifyingKey {
    /// Reads a normalised snarkjs `verification_key.json`.
    pub fn from_snarkjs(doc: &Signal) -> Result<Self, VerificationKeyError> {
        let g1 = |key: &str| {
            doc.get(key)
                .and_then(g1_from_signal)
                .ok_or_else(|| VerificationKeyError(key.to_string()))
        };
        let g2 = |key: &str| {
            doc.get(key)
                .and_then(g2_from_signal)
                .ok_or_else(|| VerificationKeyError(key.to_string()))
        };

        let ic = doc
            .get("IC")
            .and_then(Signal::as_list)
            .ok_or_else(|| VerificationKeyError("IC".to_string()))?
            .iter()
            .map(|p| g1_from_signal(p).ok_or_else(|| VerificationKeyError("IC".to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        // IC[0] is the constant term, even with no public inputs
        if ic.is_empty() {
            return Err(VerificationKeyError("IC".to_string()));
        }

        Ok(Self {
            alpha1: g1("vk_alpha_1")?,
            beta2: g2("vk_beta_2")?,
            gamma2: g2("vk_gamma_2")?,
            delta2: g2("vk_delta_2")?,
            ic,
        })
    }
}

impl From<&ark_groth16::VerifyingKey<Bn254>> for VerifyingKey {
    fn from(vk: &ark_groth16::VerifyingKey<Bn254>) -> Self {
        Self {
            alpha1: G1::from(&vk.alpha_g1),
            beta2: G2::from(&vk.beta_g2),
            gamma2: G2::from(&vk.gamma_g2),
            delta2: G2::from(&vk.delta_g2),
            ic: vk.gamma_abc_g1.iter().map(G1::from).collect(),
        }
    }
}

impl TryFrom<VerifyingKey> for ark_groth16::VerifyingKey<Bn254> {
    type Error = PointError;

    fn try_from(src: VerifyingKey) -> Result<ark_groth16::VerifyingKey<Bn254>, PointError> {
        Ok(ark_groth16::VerifyingKey {
            alpha_g1: src.alpha1.try_into()?,
            beta_g2: src.beta2.try_into()?,
            gamma_g2: src.gamma2.try_into()?,
            delta_g2: src.delta2.try_into()?,
            gamma_abc_g1: src
                .ic
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

// snarkjs points are projective `[x, y, z]`; only affine (z = 1) and infinity
// (z = 0) ever come out of its `toObject`. The `_words` readers keep `x, y`
// as written, the way `exportSolidityCallData` prints them, while the
// `_from_signal` readers map infinity to the all-zero encoding.
fn g1_affine(point: &Signal) -> Option<bool> {
    let z = point.at(2).and_then(Signal::as_u256)?;
    match z {
        z if z.is_zero() => Some(false),
        z if z == U256::one() => Some(true),
        _ => None,
    }
}

pub(crate) fn g1_words(point: &Signal) -> Option<G1> {
    g1_affine(point)?;
    Some(G1 {
        x: point.at(0)?.as_u256()?,
        y: point.at(1)?.as_u256()?,
    })
}

pub(crate) fn g1_from_signal(point: &Signal) -> Option<G1> {
    if g1_affine(point)? {
        g1_words(point)
    } else {
        Some(G1::default())
    }
}

fn g2_limbs(point: &Signal, i: usize) -> Option<[U256; 2]> {
    let el = point.at(i)?;
    Some([el.at(0)?.as_u256()?, el.at(1)?.as_u256()?])
}

fn g2_affine(point: &Signal) -> Option<bool> {
    match g2_limbs(point, 2)? {
        z if z == [U256::zero(), U256::zero()] => Some(false),
        z if z == [U256::one(), U256::zero()] => Some(true),
        _ => None,
    }
}

pub(crate) fn g2_words(point: &Signal) -> Option<G2> {
    g2_affine(point)?;
    Some(G2 {
        x: g2_limbs(point, 0)?,
        y: g2_limbs(point, 1)?,
    })
}

pub(crate) fn g2_from_signal(point: &Signal) -> Option<G2> {
    if g2_affine(point)? {
        g2_words(point)
    } else {
        Some(G2::default())
    }
}

// Words at or above the modulus are rejected rather than reduced.
pub(crate) fn u256_to_point<F: PrimeField<BigInt = BigInteger256>>(
    point: U256,
) -> Result<F, PointError> {
    F::from_bigint(BigInteger256::new(point.0)).ok_or(PointError::NonCanonical)
}

// Both sides keep little-endian u64 limbs.
pub(crate) fn point_to_u256<F: PrimeField<BigInt = BigInteger256>>(point: F) -> U256 {
    U256(point.into_bigint().0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;
    use ark_ec::CurveGroup;
    use ark_std::UniformRand;

    fn fr() -> Fr {
        Fr::from(2)
    }

    fn g1() -> G1Affine {
        let mut rng = ark_std::test_rng();
        ark_bn254::G1Projective::rand(&mut rng).into_affine()
    }

    fn g2() -> G2Affine {
        let mut rng = ark_std::test_rng();
        ark_bn254::G2Projective::rand(&mut rng).into_affine()
    }

    #[test]
    fn convert_fq() {
        let el = Fq::from(2);
        let el2 = point_to_u256(el);
        let el3: Fq = u256_to_point(el2).unwrap();
        let el4 = point_to_u256(el3);
        assert_eq!(el, el3);
        assert_eq!(el2, el4);
        assert_eq!(el2, U256::from(2));
    }

    #[test]
    fn convert_fr() {
        let el = fr();
        let el2 = point_to_u256(el);
        let el3: Fr = u256_to_point(el2).unwrap();
        let el4 = point_to_u256(el3);
        assert_eq!(el, el3);
        assert_eq!(el2, el4);
    }

    #[test]
    fn rejects_non_canonical() {
        let res: Result<Fr, _> = u256_to_point(U256::MAX);
        assert_eq!(res, Err(PointError::NonCanonical));
    }

    #[test]
    fn convert_g1() {
        let el = g1();
        let el2 = G1::from(&el);
        let el3: G1Affine = el2.try_into().unwrap();
        let el4 = G1::from(&el3);
        assert_eq!(el, el3);
        assert_eq!(el2, el4);
    }

    #[test]
    fn convert_g2() {
        let el = g2();
        let el2 = G2::from(&el);
        let el3: G2Affine = el2.try_into().unwrap();
        let el4 = G2::from(&el3);
        assert_eq!(el, el3);
        assert_eq!(el2, el4);
        assert_eq!(G2::from_tuple(el2.as_tuple().0, el2.as_tuple().1), el2);
    }

    #[test]
    fn zero_coordinates_are_infinity() {
        let p: G1Affine = G1::default().try_into().unwrap();
        assert!(p.is_zero());
        let q: G2Affine = G2::default().try_into().unwrap();
        assert!(q.is_zero());
        assert_eq!(G1::from(&G1Affine::zero()), G1::default());
    }

    #[test]
    fn off_curve_point_is_rejected() {
        let p = G1 {
            x: U256::from(1),
            y: U256::from(1),
        };
        assert_eq!(G1Affine::try_from(p), Err(PointError::NotOnCurve));
    }

    #[test]
    fn convert_vk() {
        let vk = ark_groth16::VerifyingKey::<Bn254> {
            alpha_g1: g1(),
            beta_g2: g2(),
            gamma_g2: g2(),
            delta_g2: g2(),
            gamma_abc_g1: vec![g1(), g1(), g1()],
        };
        let vk_ethers = VerifyingKey::from(&vk);
        let ark_vk: ark_groth16::VerifyingKey<Bn254> = vk_ethers.try_into().unwrap();
        assert_eq!(ark_vk, vk);
    }

    #[test]
    fn convert_proof() {
        let p = ark_groth16::Proof::<Bn254> {
            a: g1(),
            b: g2(),
            c: g1(),
        };
        let p2 = Proof::from(&p);
        let p3 = ark_groth16::Proof::try_from(p2).unwrap();
        assert_eq!(p, p3);
    }

    #[test]
    fn reads_snarkjs_points() {
        let doc = Signal::from_json(serde_json::json!({
            "a": ["1", "2", "1"],
            "inf": ["0", "1", "0"],
            "proj": ["1", "2", "5"],
            "b": [["1", "2"], ["3", "4"], ["1", "0"]],
        }));
        let a = g1_from_signal(doc.get("a").unwrap()).unwrap();
        assert_eq!(a.as_tuple(), (U256::from(1), U256::from(2)));
        assert_eq!(g1_from_signal(doc.get("inf").unwrap()), Some(G1::default()));
        assert_eq!(g1_from_signal(doc.get("proj").unwrap()), None);
        let b = g2_from_signal(doc.get("b").unwrap()).unwrap();
        assert_eq!(b.x, [U256::from(1), U256::from(2)]);
        assert_eq!(b.as_tuple().0, [U256::from(2), U256::from(1)]);
    }

    #[test]
    fn words_keep_infinity_as_written() {
        let doc = Signal::from_json(serde_json::json!({
            "inf": ["0", "1", "0"],
            "proj": ["1", "2", "5"],
            "inf2": [["0", "0"], ["1", "0"], ["0", "0"]],
        }));
        let inf = g1_words(doc.get("inf").unwrap()).unwrap();
        assert_eq!(inf.as_tuple(), (U256::zero(), U256::one()));
        assert_eq!(g1_words(doc.get("proj").unwrap()), None);

        let inf2 = g2_words(doc.get("inf2").unwrap()).unwrap();
        assert_eq!(inf2.y, [U256::one(), U256::zero()]);
        assert_eq!(g2_from_signal(doc.get("inf2").unwrap()), Some(G2::default()));
    }
}
