// src/core/net.rs
//
// Blocking HTTP GET with a fixed pause between requests. No retries.

use std::{thread, time::{Duration, Instant}};

use reqwest::blocking::Client;
use tracing::{debug, trace};

use crate::config::consts::{BASE_URL, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{Error, Result};

/// Anything that can hand back a page body for `path?query`.
/// The crawler only talks to this, so it runs offline against fixtures in tests.
pub trait PageSource {
    fn fetch(&mut self, path: &str, query: &[(&str, String)]) -> Result<String>;
}

/// Enforces a minimum gap between the *starts* of consecutive requests.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Sleep until `delay` has passed since the previous call. First call is free.
    pub fn wait(&mut self) {
        if let Some(prev) = self.last {
            let elapsed = prev.elapsed();
            if elapsed < self.delay {
                let pause = self.delay - elapsed;
                trace!("pacing: sleeping {:?}", pause);
                thread::sleep(pause);
            }
        }
        self.last = Some(Instant::now());
    }
}

pub struct HttpFetcher {
    client: Client,
    base_url: String,
    pacer: Pacer,
}

impl HttpFetcher {
    pub fn new(delay: Duration) -> Result<Self> {
        Self::with_base_url(BASE_URL, delay)
    }

    pub fn with_base_url(base_url: &str, delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: s!(base_url.trim_end_matches('/')),
            pacer: Pacer::new(delay),
        })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&mut self, path: &str, query: &[(&str, String)]) -> Result<String> {
        self.pacer.wait();

        let url = join!(&self.base_url, path);
        let t = Instant::now();
        let resp = self.client.get(&url).query(query).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http { status: status.as_u16(), url: resp.url().to_string() });
        }
        let final_url = resp.url().to_string();
        let body = resp.text()?;
        debug!("GET {} -> {} ({} bytes in {:?})", final_url, status, body.len(), t.elapsed());
        Ok(body)
    }
}
