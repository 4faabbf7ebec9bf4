//! rustls client configuration with TOFU certificate verification.
//!
//! Standard webpki chain verification runs first; self-signed capsules
//! (the normal case on Gemini) fall through to the [`TrustStore`]. A pin
//! mismatch makes the verifier reject the certificate, which aborts the
//! handshake — the connection fails closed.

use std::sync::{Arc, Mutex};

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use pollux_types::{PolluxError, Result};

use crate::trust::{TrustDecision, TrustStore};

/// Certificate verifier applying chain verification, then TOFU.
#[derive(Debug)]
pub struct TofuVerifier {
    webpki: Arc<WebPkiServerVerifier>,
    store: TrustStore,
    provider: Arc<CryptoProvider>,
    /// Host of the most recent pin mismatch, kept so the client can
    /// report the right error after rustls surfaces a generic alert.
    mismatch: Mutex<Option<String>>,
}

impl TofuVerifier {
    /// Build a verifier over Mozilla's root bundle plus the pin store.
    pub fn new(store: TrustStore) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let roots =
            RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let webpki =
            WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
                .build()
                .map_err(|e| PolluxError::Transport(format!("verifier build: {e}")))?;

        Ok(Self {
            webpki,
            store,
            provider,
            mismatch: Mutex::new(None),
        })
    }

    /// Host of the pin mismatch that failed the last handshake, if any.
    pub fn take_mismatch(&self) -> Option<String> {
        self.mismatch.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl ServerCertVerifier for TofuVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        let chain_ok = self
            .webpki
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
            .is_ok();
        let host = server_name.to_str().into_owned();

        match self.store.evaluate(&host, end_entity.as_ref(), chain_ok) {
            Ok(TrustDecision::PinMismatch) => {
                if let Ok(mut guard) = self.mismatch.lock() {
                    *guard = Some(host);
                }
                Err(rustls::Error::InvalidCertificate(
                    CertificateError::ApplicationVerificationFailure,
                ))
            },
            Ok(decision) => {
                log::debug!("trust decision for {host}: {decision:?}");
                Ok(ServerCertVerified::assertion())
            },
            Err(e) => Err(rustls::Error::General(format!("trust store: {e}"))),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Build the process-wide client configuration around a trust store.
///
/// The verifier handle is returned alongside so callers can recover the
/// mismatching host after a failed handshake.
pub fn client_config(store: TrustStore) -> Result<(Arc<ClientConfig>, Arc<TofuVerifier>)> {
    let verifier = Arc::new(TofuVerifier::new(store)?);
    let provider = Arc::clone(&verifier.provider);

    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| PolluxError::Transport(format!("TLS config: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::clone(&verifier) as Arc<dyn ServerCertVerifier>)
        .with_no_client_auth();

    Ok((Arc::new(config), verifier))
}
