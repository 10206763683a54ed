//! Translation layer between the API client and the view-state store.
//!
//! # Design
//! The repository makes exactly one request per call and never retries. It
//! turns `ApiError`s into `ErrorInfo` and unwraps response envelopes into
//! domain values. The listing treats "no data" as an empty result: any
//! failure to list collapses to `Ok(vec![])`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::PokeApiClient;
use crate::error::{ApiError, ErrorInfo};
use crate::transport::Transport;
use crate::types::PokemonDetail;

#[async_trait]
pub trait PokemonRepository: Send + Sync + 'static {
    /// Every listed name, in server order.
    async fn list_names(&self) -> Result<Vec<String>, ErrorInfo>;

    async fn get_detail(&self, name: &str) -> Result<PokemonDetail, ErrorInfo>;
}

#[async_trait]
impl<R: PokemonRepository + ?Sized> PokemonRepository for Arc<R> {
    async fn list_names(&self) -> Result<Vec<String>, ErrorInfo> {
        (**self).list_names().await
    }

    async fn get_detail(&self, name: &str) -> Result<PokemonDetail, ErrorInfo> {
        (**self).get_detail(name).await
    }
}

/// Repository backed by PokeAPI through any `Transport`.
#[derive(Debug, Clone)]
pub struct ApiRepository<T> {
    client: PokeApiClient,
    transport: T,
}

impl<T: Transport> ApiRepository<T> {
    pub fn new(client: PokeApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PokeApiClient {
        &self.client
    }
}

#[cfg(feature = "reqwest")]
impl ApiRepository<crate::transport::ReqwestTransport> {
    /// Production wiring: PokeAPI client plus a reqwest transport.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ApiError> {
        let client = PokeApiClient::new(&config.base_url, config.list_limit);
        let transport = crate::transport::ReqwestTransport::new(config)?;
        Ok(Self::new(client, transport))
    }
}

#[async_trait]
impl<T: Transport + 'static> PokemonRepository for ApiRepository<T> {
    async fn list_names(&self) -> Result<Vec<String>, ErrorInfo> {
        let request = self.client.build_list_pokemon();
        let outcome = match self.transport.execute(request).await {
            Ok(response) => self.client.parse_list_pokemon(response),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(names) => Ok(names),
            Err(e) => {
                tracing::warn!(error = %e, "listing failed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn get_detail(&self, name: &str) -> Result<PokemonDetail, ErrorInfo> {
        let request = self.client.build_get_pokemon(name);
        let outcome: Result<PokemonDetail, ApiError> = match self.transport.execute(request).await
        {
            Ok(response) => self.client.parse_get_pokemon(response),
            Err(e) => Err(e),
        };
        outcome.map_err(|e| {
            let info = ErrorInfo::from(e);
            tracing::warn!(pokemon = name, kind = %info.kind, error = %info.message, "detail fetch failed");
            info
        })
    }
}
