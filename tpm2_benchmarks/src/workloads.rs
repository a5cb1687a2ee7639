// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The operation sequences being measured. Each function performs one
//! complete iteration against a live session and flushes every transient
//! object it creates on the success path.

use sha2::{Digest as _, Sha256};
use tss_esapi::attributes::ObjectAttributesBuilder;
use tss_esapi::constants::tss::{TPM2_RH_NULL, TPM2_ST_HASHCHECK};
use tss_esapi::handles::{KeyHandle, ObjectHandle, PcrHandle};
use tss_esapi::interface_types::algorithm::{HashingAlgorithm, PublicAlgorithm};
use tss_esapi::interface_types::ecc::EccCurve;
use tss_esapi::interface_types::key_bits::RsaKeyBits;
use tss_esapi::interface_types::resource_handles::Hierarchy;
use tss_esapi::interface_types::session_handles::AuthSession;
use tss_esapi::structures::digest_values::DigestValues;
use tss_esapi::structures::{
    Auth, Digest, EccParameter, EccPoint, EccScheme, HashScheme, HashcheckTicket, KeyedHashScheme,
    Public, PublicBuilder, PublicEccParametersBuilder, PublicKeyRsa, PublicKeyedHashParameters,
    PublicRsaParametersBuilder, RsaExponent, RsaScheme, SensitiveData, SignatureScheme,
};
use tss_esapi::tss2_esys::TPMT_TK_HASHCHECK;
use tss_esapi::Context;

use crate::error::BenchmarkError;
use crate::session::TpmSession;

const SEAL_AUTH: &[u8] = b"password";
const SEAL_SECRET: &[u8] = b"secrets";
const PCR_MEASUREMENT: &[u8] = b"measurement";
// Placeholder digest to sign; its content is irrelevant to the timing.
const SIGN_DIGEST: [u8; 32] = [0; 32];
const SEED_BYTES: usize = 4;

/// Seal a secret into a keyed-hash object bound to the owner hierarchy,
/// unseal it with the password authorization and check the round trip.
pub fn seal_unseal(session: &mut TpmSession) -> Result<(), BenchmarkError> {
    let ctx = session.context_mut();
    let auth = Auth::try_from(SEAL_AUTH.to_vec())?;
    let sensitive = SensitiveData::try_from(SEAL_SECRET.to_vec())?;
    let public = sealed_object_template()?;

    let created = ctx.execute_with_nullauth_session(|ctx| {
        ctx.create_primary(
            Hierarchy::Owner,
            public,
            Some(auth.clone()),
            Some(sensitive),
            None,
            None,
        )
    })?;
    let handle = ObjectHandle::from(created.key_handle);

    ctx.tr_set_auth(handle, auth)?;
    let unsealed = ctx.execute_with_session(Some(AuthSession::Password), |ctx| ctx.unseal(handle));
    ctx.flush_context(handle)?;

    if unsealed?.as_slice() != SEAL_SECRET {
        return Err(BenchmarkError::UnsealMismatch);
    }
    Ok(())
}

/// Extend PCR 0 in the SHA-256 bank with a fixed measurement.
pub fn pcr_extend(session: &mut TpmSession) -> Result<(), BenchmarkError> {
    let measurement = Digest::try_from(Sha256::digest(PCR_MEASUREMENT).to_vec())?;
    let mut digests = DigestValues::new();
    digests.set(HashingAlgorithm::Sha256, measurement);

    session
        .context_mut()
        .execute_with_nullauth_session(|ctx| ctx.pcr_extend(PcrHandle::Pcr0, digests))?;
    Ok(())
}

/// Create an RSA-2048 PSS signing key seeded with device randomness, sign a
/// fixed digest with the key's own scheme and verify the signature.
pub fn rsa_2048_create_sign_verify(session: &mut TpmSession) -> Result<(), BenchmarkError> {
    let ctx = session.context_mut();
    let seed = ctx.get_random(SEED_BYTES)?;
    let public = rsa_signing_template(seed.as_slice())?;

    let created = ctx.execute_with_nullauth_session(|ctx| {
        ctx.create_primary(Hierarchy::Owner, public, None, None, None, None)
    })?;

    sign_and_verify(ctx, created.key_handle)?;
    ctx.flush_context(created.key_handle.into())?;
    Ok(())
}

/// Same shape as the RSA benchmark with an ECDSA P-256 key, the random
/// bytes seeding the public point's X coordinate.
pub fn ecc_p256_create_sign_verify(session: &mut TpmSession) -> Result<(), BenchmarkError> {
    let ctx = session.context_mut();
    let seed = ctx.get_random(SEED_BYTES)?;
    let public = ecc_signing_template(seed.as_slice())?;

    let created = ctx.execute_with_nullauth_session(|ctx| {
        ctx.create_primary(Hierarchy::Owner, public, None, None, None, None)
    })?;

    sign_and_verify(ctx, created.key_handle)?;
    ctx.flush_context(created.key_handle.into())?;
    Ok(())
}

fn sign_and_verify(ctx: &mut Context, key: KeyHandle) -> Result<(), BenchmarkError> {
    let digest = Digest::try_from(SIGN_DIGEST.as_slice())?;
    let validation = null_hashcheck_ticket()?;

    let signature = ctx.execute_with_nullauth_session(|ctx| {
        // A null scheme defers to the scheme baked into the key.
        ctx.sign(key, digest.clone(), SignatureScheme::Null, validation)
    })?;
    ctx.verify_signature(key, digest, signature)?;
    Ok(())
}

fn sealed_object_template() -> Result<Public, BenchmarkError> {
    let attributes = ObjectAttributesBuilder::new()
        .with_fixed_tpm(true)
        .with_fixed_parent(true)
        .with_user_with_auth(true)
        .with_no_da(true)
        .build()?;

    Ok(PublicBuilder::new()
        .with_public_algorithm(PublicAlgorithm::KeyedHash)
        .with_name_hashing_algorithm(HashingAlgorithm::Sha256)
        .with_object_attributes(attributes)
        .with_keyed_hash_parameters(PublicKeyedHashParameters::new(KeyedHashScheme::Null))
        .with_keyed_hash_unique_identifier(Digest::default())
        .build()?)
}

fn rsa_signing_template(seed: &[u8]) -> Result<Public, BenchmarkError> {
    let parameters = PublicRsaParametersBuilder::new_unrestricted_signing_key(
        RsaScheme::RsaPss(HashScheme::new(HashingAlgorithm::Sha256)),
        RsaKeyBits::Rsa2048,
        RsaExponent::default(),
    )
    .build()?;

    Ok(PublicBuilder::new()
        .with_public_algorithm(PublicAlgorithm::Rsa)
        .with_name_hashing_algorithm(HashingAlgorithm::Sha256)
        .with_object_attributes(signing_key_attributes()?)
        .with_rsa_parameters(parameters)
        .with_rsa_unique_identifier(PublicKeyRsa::try_from(seed)?)
        .build()?)
}

fn ecc_signing_template(seed: &[u8]) -> Result<Public, BenchmarkError> {
    let parameters = PublicEccParametersBuilder::new_unrestricted_signing_key(
        EccScheme::EcDsa(HashScheme::new(HashingAlgorithm::Sha256)),
        EccCurve::NistP256,
    )
    .build()?;

    Ok(PublicBuilder::new()
        .with_public_algorithm(PublicAlgorithm::Ecc)
        .with_name_hashing_algorithm(HashingAlgorithm::Sha256)
        .with_object_attributes(signing_key_attributes()?)
        .with_ecc_parameters(parameters)
        .with_ecc_unique_identifier(EccPoint::new(
            EccParameter::try_from(seed)?,
            EccParameter::default(),
        ))
        .build()?)
}

fn signing_key_attributes() -> Result<tss_esapi::attributes::ObjectAttributes, BenchmarkError> {
    Ok(ObjectAttributesBuilder::new()
        .with_fixed_tpm(true)
        .with_fixed_parent(true)
        .with_sensitive_data_origin(true)
        .with_user_with_auth(true)
        .with_sign_encrypt(true)
        .with_no_da(true)
        .build()?)
}

fn null_hashcheck_ticket() -> Result<HashcheckTicket, BenchmarkError> {
    Ok(HashcheckTicket::try_from(TPMT_TK_HASHCHECK {
        tag: TPM2_ST_HASHCHECK,
        hierarchy: TPM2_RH_NULL,
        digest: Default::default(),
    })?)
}
