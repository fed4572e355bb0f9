//! Proxy selection for browser contexts.
//!
//! A pool file holds one proxy per line, `host:port` or
//! `host:port:username:password`. Blank lines and `#` comments are ignored.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Egress proxy for one browser context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parse a `host:port[:username:password]` line
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.trim().split(':').map(str::trim).collect();

        let (host, port, credentials) = match parts.as_slice() {
            [host, port] => (*host, *port, None),
            [host, port, username, password] => (*host, *port, Some((*username, *password))),
            _ => bail!("Expected host:port or host:port:username:password, got {:?}", line),
        };

        if host.is_empty() {
            bail!("Proxy host is empty in {:?}", line);
        }
        let port: u16 = port
            .parse()
            .with_context(|| format!("Invalid proxy port in {:?}", line))?;

        Ok(Self {
            host: host.to_string(),
            port,
            username: credentials.map(|(u, _)| u.to_string()),
            password: credentials.map(|(_, p)| p.to_string()),
        })
    }

    /// Proxy server address handed to the browser
    pub fn server(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Username and password, if both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

/// One-shot supply of proxies
#[derive(Debug, Default)]
pub struct ProxyPool {
    proxies: std::vec::IntoIter<ProxyConfig>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<ProxyConfig>) -> Self {
        Self {
            proxies: proxies.into_iter(),
        }
    }

    /// Parse a pool from file contents
    pub fn parse(content: &str) -> Result<Self> {
        let proxies = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ProxyConfig::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(proxies))
    }

    /// Read a pool file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read proxy file {}", path.display()))?;
        Self::parse(&content)
    }
}

impl Iterator for ProxyPool {
    type Item = ProxyConfig;

    fn next(&mut self) -> Option<Self::Item> {
        self.proxies.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let proxy = ProxyConfig::parse(" 10.0.0.1 : 8080 ").unwrap();
        assert_eq!(proxy.host, "10.0.0.1");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.server(), "http://10.0.0.1:8080");
        assert!(proxy.credentials().is_none());
    }

    #[test]
    fn test_parse_with_credentials() {
        let proxy = ProxyConfig::parse("proxy.example.com:3128:alice:s3cret").unwrap();
        assert_eq!(proxy.credentials(), Some(("alice", "s3cret")));
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(ProxyConfig::parse("proxy.example.com").is_err());
        assert!(ProxyConfig::parse("proxy.example.com:port").is_err());
        assert!(ProxyConfig::parse(":8080").is_err());
        assert!(ProxyConfig::parse("a:1:user").is_err());
    }

    #[test]
    fn test_pool_is_consumed_in_order() {
        let mut pool = ProxyPool::parse("# pool\n\n1.1.1.1:80\n2.2.2.2:81:u:p\n").unwrap();
        assert_eq!(pool.next().unwrap().host, "1.1.1.1");
        assert_eq!(pool.next().unwrap().port, 81);
        assert!(pool.next().is_none());
    }

    #[test]
    fn test_pool_reports_bad_entry() {
        assert!(ProxyPool::parse("1.1.1.1:80\nbroken\n").is_err());
    }
}
