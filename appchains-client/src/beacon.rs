//! Beacon lookups
//!
//! A beacon answers whether an allele is observed at a chromosome
//! position. Each lookup is a single unauthenticated GET; the response
//! body is returned as the server sent it.

use std::fmt;

use tracing::debug;

use crate::AppChainsClient;
use crate::error::Result;
use crate::transport::HttpRequest;

/// Which beacon to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeaconKind {
    /// Sequencing.com's own beacon
    Sequencing,
    /// Aggregated public beacons
    Public,
}

impl BeaconKind {
    /// Remote method name of this beacon
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Sequencing => "SequencingBeacon",
            Self::Public => "PublicBeacons",
        }
    }
}

impl fmt::Display for BeaconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl AppChainsClient {
    /// Query a beacon for an allele at a chromosome position
    ///
    /// # Example
    /// ```no_run
    /// # use appchains_client::{AppChainsClient, BeaconKind};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = AppChainsClient::without_token("api.sequencing.com")?;
    /// let answer = client.get_beacon(BeaconKind::Public, 1, 2, "A").await?;
    /// println!("{}", answer);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_beacon(
        &self,
        kind: BeaconKind,
        chrom: u32,
        pos: u64,
        allele: &str,
    ) -> Result<String> {
        let parameters = [
            ("chrom", chrom.to_string()),
            ("pos", pos.to_string()),
            ("allele", allele.to_string()),
        ];
        self.get_beacon_with_query(kind.method_name(), &parameters)
            .await
    }

    pub async fn get_sequencing_beacon(&self, chrom: u32, pos: u64, allele: &str) -> Result<String> {
        self.get_beacon(BeaconKind::Sequencing, chrom, pos, allele)
            .await
    }

    pub async fn get_public_beacon(&self, chrom: u32, pos: u64, allele: &str) -> Result<String> {
        self.get_beacon(BeaconKind::Public, chrom, pos, allele).await
    }

    /// Call a beacon method with arbitrary query parameters
    pub async fn get_beacon_with_query(
        &self,
        method_name: &str,
        parameters: &[(&str, String)],
    ) -> Result<String> {
        let url = self.endpoints.beacon(method_name, parameters)?;
        debug!("Beacon lookup: {}", url);

        let response = self.transport.send(HttpRequest::get(url)).await?;
        Ok(Self::expect_success(response)?.text())
    }
}
