use std::borrow::Cow;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::{
    Resource,
    api::{ObjectMeta, TypeMeta},
    core::DynamicResourceScope,
};

use crate::discover::CORE_GROUP;

/// Note about own `DynamicObject` instead of `kube::api::DynamicObject`.
/// The original `kube::api::DynamicObject` uses `kube::api::ApiResource`
/// which do not have `short_names` field compared to
/// `k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource`.
///
/// See https://github.com/kube-rs/kube/issues/1002
///
/// Keying objects on `APIResource` keeps `kubectl regex-match get po` working
/// the same way `kubectl get po` does.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct DynamicObject {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// All other keys
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Group used in URLs: empty for the core group or when discovery left it unset.
fn url_group(dt: &APIResource) -> &str {
    match dt.group.as_deref() {
        Some(CORE_GROUP) | None => "",
        Some(group) => group,
    }
}

impl Resource for DynamicObject {
    type DynamicType = APIResource;
    type Scope = DynamicResourceScope;

    fn group(dt: &APIResource) -> Cow<'_, str> {
        url_group(dt).into()
    }

    fn version(dt: &APIResource) -> Cow<'_, str> {
        dt.version.as_deref().unwrap_or("v1").into()
    }

    fn kind(dt: &APIResource) -> Cow<'_, str> {
        dt.kind.as_str().into()
    }

    fn api_version(dt: &APIResource) -> Cow<'_, str> {
        let version = dt.version.as_deref().unwrap_or("v1");
        match url_group(dt) {
            "" => version.into(),
            group => format!("{group}/{version}").into(),
        }
    }

    fn plural(dt: &APIResource) -> Cow<'_, str> {
        dt.name.as_str().into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
