//! Access gate middleware
//!
//! The single chokepoint every inbound request passes through. Each request
//! ends in exactly one of three terminal outcomes:
//!
//! - bypass/public path: forwarded untouched, no identity work,
//! - protected path with a resolved principal: principal injected into
//!   request extensions, then forwarded,
//! - protected path without one: `401` JSON for `/api` paths, `302` to the
//!   login surface for page paths. The handler never runs.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use std::rc::Rc;

use crate::identity::IdentityResolver;
use crate::routes::{prefix_match, RouteClass, RouteTable};

const API_PREFIX: &str = "/api";

/// Access Gate middleware
pub struct AccessGate {
    inner: Rc<GateInner>,
}

struct GateInner {
    table: RouteTable,
    resolver: IdentityResolver,
    login_path: String,
}

impl AccessGate {
    pub fn new(
        table: RouteTable,
        resolver: IdentityResolver,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            inner: Rc::new(GateInner {
                table,
                resolver,
                login_path: login_path.into(),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateService {
            service: Rc::new(service),
            inner: self.inner.clone(),
        }))
    }
}

pub struct AccessGateService<S> {
    service: Rc<S>,
    inner: Rc<GateInner>,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let inner = self.inner.clone();

        Box::pin(async move {
            // Classification strictly precedes identity resolution; public
            // surfaces never pay for cryptographic work here.
            match inner.table.classify(req.path()) {
                RouteClass::Bypass | RouteClass::Public => {
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                RouteClass::Protected => match inner.resolver.resolve(req.request()) {
                    Some(user_id) => {
                        req.extensions_mut().insert(user_id);
                        service.call(req).await.map(|res| res.map_into_left_body())
                    }
                    None => {
                        tracing::debug!(path = %req.path(), "unauthenticated request rejected");
                        let response = if prefix_match(API_PREFIX, req.path()) {
                            HttpResponse::Unauthorized().json(json!({
                                "error": "Authentication required",
                                "status": 401
                            }))
                        } else {
                            HttpResponse::Found()
                                .insert_header((header::LOCATION, inner.login_path.clone()))
                                .finish()
                        };
                        Ok(req.into_response(response).map_into_right_body())
                    }
                },
            }
        })
    }
}
