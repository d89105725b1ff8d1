//! AWS support for the AWS-IAM login method
//!
//! - [`credentials`] - credential provider chain adapter
//! - [`region`] - region override and IMDSv2 discovery
//! - [`canonical`] - SigV4 canonical request pieces
//! - [`sigv4`] - SigV4 request signer

pub mod canonical;
pub mod credentials;
pub mod region;
pub mod sigv4;

pub use credentials::{AwsCredentials, CredentialProvider, DefaultChainProvider, StaticCredentialProvider};
pub use region::RegionResolver;
pub use sigv4::{RequestSigner, SignedHttpRequest, UnsignedHttpRequest};
