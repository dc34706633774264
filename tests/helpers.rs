// Shared test doubles for the decision engine.
//
// Discovery and probing are replaced by scripted in-memory versions so the
// verdict logic can be exercised without any network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use ns_checker::dns::{NameServerDiscovery, ProbeTarget, Prober};
use ns_checker::{CheckError, CheckPolicy, Checker, NameServerSet, ProbeResult, ResponseClass};

/// Discovery double returning a fixed set and counting calls.
pub struct FixedDiscovery {
    nameservers: Vec<String>,
    pub calls: Mutex<usize>,
}

impl FixedDiscovery {
    pub fn new(nameservers: &[&str]) -> Self {
        Self {
            nameservers: nameservers.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl NameServerDiscovery for FixedDiscovery {
    async fn query_ns(&self, _domain: &str) -> NameServerSet {
        *self.calls.lock().unwrap() += 1;
        self.nameservers.iter().collect()
    }
}

/// Prober double: answers per target, records every target probed.
///
/// Targets without a script answer NOERROR.
#[derive(Default)]
pub struct ScriptedProber {
    results: HashMap<String, ProbeResult>,
    pub probed: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, target: &str, result: ProbeResult) -> Self {
        self.results.insert(target.to_string(), result);
        self
    }

    #[allow(dead_code)]
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, _domain: &str, target: &ProbeTarget) -> Result<ProbeResult, CheckError> {
        let key = target.to_string();
        self.probed.lock().unwrap().push(key.clone());
        Ok(self
            .results
            .get(&key)
            .cloned()
            .unwrap_or_else(|| answered(ResponseClass::NoError)))
    }
}

#[allow(dead_code)] // Not every test file uses every helper
pub fn answered(code: ResponseClass) -> ProbeResult {
    ProbeResult::answered(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), code, Vec::new())
}

#[allow(dead_code)]
pub fn silent() -> ProbeResult {
    ProbeResult::silent(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)))
}

/// Builds a checker over the doubles with the default policy (baseline 8.8.8.8).
pub fn checker(discovery: Arc<FixedDiscovery>, prober: Arc<ScriptedProber>) -> Checker {
    Checker::new(discovery, prober, CheckPolicy::default())
}
