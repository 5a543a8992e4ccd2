//! Invocation names of the bundled plugins.

pub const ISSUE_CREDENTIAL: &str = "issueCredential";
pub const VERIFY_CREDENTIAL: &str = "verifyCredential";
pub const ISSUE_PRESENTATION: &str = "issuePresentation";
pub const VERIFY_PRESENTATION: &str = "verifyPresentation";
pub const RESOLVE_DID: &str = "resolveDid";
pub const DID_TO_VERIFICATION_METHOD: &str = "didToVerificationMethod";
pub const CREATE_JWE: &str = "createJwe";
pub const DECRYPT_JWE: &str = "decryptJwe";
pub const CLEAR_DID_CACHE: &str = "clearDidCache";

pub const GET_SUBJECT_DID: &str = "getSubjectDid";
pub const GET_SUBJECT_KEYPAIR: &str = "getSubjectKeypair";

pub const GET_TEST_VC: &str = "getTestVc";
pub const GET_TEST_VP: &str = "getTestVp";
pub const GET_DID_AUTH_VP: &str = "getDidAuthVp";
pub const PUBLISH_CREDENTIAL: &str = "publishCredential";
pub const READ_FROM_CONTENT_STORE: &str = "readFromContentStore";
pub const READ_FROM_CERAMIC: &str = "readFromCeramic";
pub const ADD_CREDENTIAL: &str = "addCredential";
pub const GET_CREDENTIAL: &str = "getCredential";
pub const GET_CREDENTIALS: &str = "getCredentials";
pub const GET_CREDENTIALS_LIST: &str = "getCredentialsList";
pub const REMOVE_CREDENTIAL: &str = "removeCredential";
pub const RELABEL_CREDENTIAL: &str = "relabelCredential";

pub const ENCRYPT_OBJECT: &str = "encryptObject";
pub const DECRYPT_OBJECT: &str = "decryptObject";

pub const STORE_CREDENTIAL_VIA_CHAPI_DID_AUTH: &str = "storeCredentialViaChapiDidAuth";
pub const STORE_PRESENTATION_VIA_CHAPI: &str = "storePresentationViaChapi";

pub const CREATE_SIGNING_AUTHORITY: &str = "createSigningAuthority";
pub const GET_SIGNING_AUTHORITIES: &str = "getSigningAuthorities";
pub const REGISTER_SIGNING_AUTHORITY: &str = "registerSigningAuthority";
pub const GET_REGISTERED_SIGNING_AUTHORITIES: &str = "getRegisteredSigningAuthorities";
pub const GET_REGISTERED_SIGNING_AUTHORITY: &str = "getRegisteredSigningAuthority";
pub const GENERATE_CLAIM_LINK: &str = "generateClaimLink";
pub const GENERATE_BOOST_CLAIM_LINK: &str = "generateBoostClaimLink";
