use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use wallet_providers::common_models::did::DidValue;

use super::{
    argument, Args, IdCapability, MockIdCapability, MockPlugin, Plugin, Wallet, WalletBuilder,
};
use crate::error::WalletError;

/// Answers every method with a constant.
struct ConstPlugin {
    name: &'static str,
    methods: Vec<&'static str>,
    dependent: Vec<&'static str>,
    value: Value,
}

impl ConstPlugin {
    fn new(name: &'static str, methods: Vec<&'static str>, value: Value) -> Arc<dyn Plugin> {
        Arc::new(Self {
            name,
            methods,
            dependent: vec![],
            value,
        })
    }
}

#[async_trait]
impl Plugin for ConstPlugin {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn methods(&self) -> Vec<String> {
        self.methods.iter().map(ToString::to_string).collect()
    }

    fn dependent_methods(&self) -> Vec<String> {
        self.dependent.iter().map(ToString::to_string).collect()
    }

    async fn call(
        &self,
        _wallet: &Wallet,
        _method: &str,
        _args: Args,
    ) -> Result<Value, WalletError> {
        Ok(self.value.clone())
    }
}

/// `method` answers with `{"via": <result of target>}`, either through the wallet or
/// through the shadowed implementation.
struct ForwardPlugin {
    name: &'static str,
    method: &'static str,
    target: &'static str,
    dependent: bool,
    previous: bool,
}

#[async_trait]
impl Plugin for ForwardPlugin {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn methods(&self) -> Vec<String> {
        vec![self.method.to_string()]
    }

    fn dependent_methods(&self) -> Vec<String> {
        if self.dependent {
            vec![self.target.to_string()]
        } else {
            vec![]
        }
    }

    async fn call(&self, wallet: &Wallet, _method: &str, args: Args) -> Result<Value, WalletError> {
        let result = if self.previous {
            wallet.call_previous(self.name, self.target, args).await?
        } else {
            wallet.call(self.target, args).await?
        };

        Ok(json!({ "via": result }))
    }
}

fn forward(name: &'static str, method: &'static str, target: &'static str) -> ForwardPlugin {
    ForwardPlugin {
        name,
        method,
        target,
        dependent: false,
        previous: false,
    }
}

#[tokio::test]
async fn test_empty_wallet() {
    let wallet = Wallet::empty();

    assert!(matches!(
        wallet.call("issueCredential", vec![]).await,
        Err(WalletError::MethodNotFound(method)) if method == "issueCredential"
    ));
    assert!(matches!(wallet.id(), Err(WalletError::MissingIdentity)));
    assert!(wallet.methods().is_empty());
}

#[tokio::test]
async fn test_add_plugin_leaves_receiver_unchanged() {
    let empty = Wallet::empty();
    let wallet = empty
        .add_plugin(ConstPlugin::new("a", vec!["methodA"], json!(1)))
        .unwrap();

    assert_eq!(json!(1), wallet.call("methodA", vec![]).await.unwrap());
    assert!(!empty.has_method("methodA"));
    assert!(empty.plugin_names().is_empty());
}

#[test]
fn test_duplicate_plugin_rejected() {
    let wallet = Wallet::empty()
        .add_plugin(ConstPlugin::new("a", vec!["methodA"], json!(1)))
        .unwrap();

    assert!(matches!(
        wallet.add_plugin(ConstPlugin::new("a", vec!["other"], json!(2))),
        Err(WalletError::DuplicatePlugin(name)) if name == "a"
    ));
}

#[tokio::test]
async fn test_dependency_must_exist_at_add_time() {
    let dependent = || {
        Arc::new(ForwardPlugin {
            dependent: true,
            ..forward("b", "methodB", "methodA")
        }) as Arc<dyn Plugin>
    };

    assert!(matches!(
        Wallet::empty().add_plugin(dependent()),
        Err(WalletError::MissingDependency { plugin, method })
            if plugin == "b" && method == "methodA"
    ));

    let wallet = Wallet::empty()
        .add_plugin(ConstPlugin::new("a", vec!["methodA"], json!("from a")))
        .unwrap()
        .add_plugin(dependent())
        .unwrap();

    assert_eq!(
        json!({ "via": "from a" }),
        wallet.call("methodB", vec![]).await.unwrap()
    );
}

#[tokio::test]
async fn test_last_added_wins_and_previous_is_reachable() {
    let wallet = WalletBuilder::new()
        .plugin(ConstPlugin::new("first", vec!["shared"], json!("first")))
        .plugin(ConstPlugin::new("second", vec!["shared"], json!("second")))
        .plugin(Arc::new(ForwardPlugin {
            dependent: true,
            previous: true,
            ..forward("wrapper", "shared", "shared")
        }))
        .build()
        .unwrap();

    assert_eq!(
        json!({ "via": "second" }),
        wallet.call("shared", vec![]).await.unwrap()
    );
    assert_eq!(
        json!("first"),
        wallet.call_previous("second", "shared", vec![]).await.unwrap()
    );
    assert!(matches!(
        wallet.call_previous("first", "shared", vec![]).await,
        Err(WalletError::MethodNotFound(_))
    ));
    assert_eq!(vec!["shared"], wallet.methods());
}

#[tokio::test]
async fn test_forward_use_at_call_time() {
    let wallet = Wallet::empty()
        .add_plugin(Arc::new(forward("early", "methodEarly", "methodLate")))
        .unwrap();

    assert!(matches!(
        wallet.call("methodEarly", vec![]).await,
        Err(WalletError::MethodNotFound(method)) if method == "methodLate"
    ));

    let wallet = wallet
        .add_plugin(ConstPlugin::new("late", vec!["methodLate"], json!(42)))
        .unwrap();

    assert_eq!(
        json!({ "via": 42 }),
        wallet.call("methodEarly", vec![]).await.unwrap()
    );
}

#[test]
fn test_id_comes_from_last_provider() {
    fn with_id(name: &'static str, did: &'static str) -> Arc<dyn Plugin> {
        let mut plugin = MockPlugin::new();
        plugin.expect_name().return_const(name.to_string());
        plugin.expect_methods().return_const(vec![]);
        plugin.expect_dependent_methods().return_const(vec![]);
        plugin.expect_id().returning(move || {
            let mut id = MockIdCapability::new();
            id.expect_did()
                .returning(move |_| Ok(DidValue::from(did.to_string())));
            Some(Arc::new(id) as Arc<dyn IdCapability>)
        });
        Arc::new(plugin)
    }

    let wallet = WalletBuilder::new()
        .plugin(with_id("one", "did:example:one"))
        .plugin(with_id("two", "did:example:two"))
        .plugin(ConstPlugin::new("no-id", vec!["x"], json!(null)))
        .build()
        .unwrap();

    assert_eq!(
        "did:example:two",
        wallet.id().unwrap().did(None).unwrap().as_str()
    );
}

#[tokio::test]
async fn test_invoke_decodes_result() {
    let wallet = Wallet::empty()
        .add_plugin(ConstPlugin::new(
            "did",
            vec!["getSubjectDid"],
            json!("did:key:z6MkTest"),
        ))
        .unwrap();

    let did = wallet.invoke().get_subject_did(None).await.unwrap();
    assert_eq!("did:key:z6MkTest", did.as_str());

    let wallet = Wallet::empty()
        .add_plugin(ConstPlugin::new("list", vec!["getCredentials"], json!(1)))
        .unwrap();
    assert!(matches!(
        wallet.invoke().get_credentials().await,
        Err(WalletError::InvalidArguments { method, .. }) if method == "getCredentials"
    ));
}

#[test]
fn test_argument_decoding() {
    let args = vec![json!("title"), json!(5)];

    assert_eq!("title", argument::<String>("m", &args, 0).unwrap());
    assert_eq!(None, argument::<Option<String>>("m", &args, 2).unwrap());
    assert!(matches!(
        argument::<String>("m", &args, 1),
        Err(WalletError::InvalidArguments { method, .. }) if method == "m"
    ));
}
