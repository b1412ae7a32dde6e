#![allow(dead_code)]

use kube::Client;
use serde_json::{Value, json};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// Client pointed at the mock API server. Plain HTTP, no auth.
pub fn client_for(server: &MockServer) -> Client {
    // rustls needs a process-level crypto provider before the client's
    // TLS stack is constructed; the binary installs one in main(), but
    // tests never run main(). Installing here (ignoring "already set")
    // mirrors that step. Both aws-lc-rs and ring are enabled in the
    // dependency tree, so the provider must be chosen explicitly.
    let _ = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::aws_lc_rs::default_provider(),
    );
    let config = kube::Config::new(server.uri().parse().unwrap());
    Client::try_from(config).expect("client for mock server")
}

/// Kubernetes-style Status body so the client classifies the error.
pub fn status_body(code: u16, reason: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code,
    }))
}

pub fn not_found(kind: &str, name: &str) -> ResponseTemplate {
    status_body(
        404,
        "NotFound",
        &format!("{kind} \"{name}\" not found"),
    )
}

pub fn configmap_body(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": "kuberbs",
            "namespace": "kube-system",
            "resourceVersion": "1",
        },
        "data": data,
    }))
}

pub fn rbs_list_body(namespaces: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "doit-intl.com/v1",
        "kind": "RbsList",
        "metadata": { "resourceVersion": "1" },
        "items": [{
            "apiVersion": "doit-intl.com/v1",
            "kind": "Rbs",
            "metadata": { "name": "kuberbs", "namespace": "default" },
            "spec": { "namespaces": namespaces },
        }],
    }))
}

pub fn empty_rbs_list_body() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "doit-intl.com/v1",
        "kind": "RbsList",
        "metadata": { "resourceVersion": "1" },
        "items": [],
    }))
}

/// Deployment with the given containers; `progressing` sets the
/// lastUpdateTime of a Progressing condition when present.
pub fn deployment_body(
    namespace: &str,
    name: &str,
    containers: &[(&str, &str)],
    progressing: Option<&str>,
) -> ResponseTemplate {
    let containers: Vec<Value> = containers
        .iter()
        .map(|(n, i)| json!({ "name": n, "image": i }))
        .collect();
    let mut conditions = vec![json!({
        "type": "Available",
        "status": "True",
    })];
    if let Some(ts) = progressing {
        conditions.push(json!({
            "type": "Progressing",
            "status": "True",
            "reason": "NewReplicaSetAvailable",
            "lastUpdateTime": ts,
        }));
    }
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "namespace": namespace },
        "spec": {
            "selector": { "matchLabels": { "app": name } },
            "template": {
                "metadata": { "labels": { "app": name } },
                "spec": { "containers": containers },
            },
        },
        "status": { "conditions": conditions },
    }))
}

/// Echoes the submitted object back, as the API server does for
/// create/replace.
pub struct EchoObject;

impl Respond for EchoObject {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_raw(request.body.clone(), "application/json")
    }
}
