// src/core/session.rs

// Login, job submission and results fetch. One Session owns one cookie jar;
// callers hold as many independent sessions as they need.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::core::forms::{self, Form};
use crate::core::markup::Page;
use crate::error::SessionError;
use crate::params::{
    BASE_URL, DEFAULT_ALGORITHM_VERSION, HTTP_TIMEOUT_SECS, LOGIN_ACTION, RESULTS_URL,
    SUBMIT_ACTION, USER_AGENT,
};
use crate::results::{self, JobRecord};

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// Parameters of one reverse-engineering job submission.
#[derive(Clone)]
pub struct JobRequest {
    pub title: String,
    pub mrna: String,
    pub organism: String,
    pub algorithm_version: String,
}

impl JobRequest {
    pub fn new(title: &str, mrna: &str, organism: &str) -> Self {
        Self {
            title: s!(title),
            mrna: s!(mrna),
            organism: s!(organism),
            algorithm_version: s!(DEFAULT_ALGORITHM_VERSION),
        }
    }
}

/// An authenticated session against the calculator service.
pub struct Session {
    client: Client,
}

impl Session {
    /// Open the reverse-engineering page and authenticate through its
    /// login form. The session cookie lives in the client's jar.
    pub fn login(credentials: &Credentials) -> Result<Session, SessionError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        let body = get(&client, BASE_URL)?;
        let form = forms::find_by_action(&body, LOGIN_ACTION)?;
        let payload = form.payload(&[
            ("uname", credentials.user.as_str()),
            ("pwname", credentials.pass.as_str()),
        ]);
        submit(&client, &form, &payload)?;

        logf!("logged in as {}", credentials.user);
        Ok(Session { client })
    }

    /// Submit one reverse-engineering job. The service queues it; results
    /// show up on the results page once computed.
    pub fn submit_reverse_job(&self, job: &JobRequest) -> Result<(), SessionError> {
        let body = get(&self.client, BASE_URL)?;
        let form = forms::find_by_action(&body, SUBMIT_ACTION)?;
        let payload = form.payload(&[
            ("title", job.title.as_str()),
            ("mRNA", job.mrna.as_str()),
            ("organism", job.organism.as_str()),
            ("algorithm_version", job.algorithm_version.as_str()),
        ]);
        submit(&self.client, &form, &payload)?;

        logf!("submitted reverse job {:?}", job.title);
        Ok(())
    }

    /// Fetch the results listing and hand it over as a parsed page.
    pub fn fetch_results_page(&self) -> Result<Page, SessionError> {
        let body = get(&self.client, RESULTS_URL)?;
        logd!("results page fetched, {} bytes", body.len());
        Ok(Page::parse(&body))
    }

    /// Fetch the results page and parse every job on it.
    pub fn fetch_results(&self) -> Result<Vec<JobRecord>, SessionError> {
        let page = self.fetch_results_page()?;
        Ok(results::collect(&page)?)
    }
}

fn get(client: &Client, url: &str) -> Result<String, SessionError> {
    Ok(client.get(url).send()?.error_for_status()?.text()?)
}

fn submit(client: &Client, form: &Form, payload: &[(String, String)]) -> Result<(), SessionError> {
    let url = action_url(&form.action, BASE_URL)?;
    client.post(url).form(payload).send()?.error_for_status()?;
    Ok(())
}

/// The service writes bare action names; resolve them against the page URL.
fn action_url(action: &str, base: &str) -> Result<Url, SessionError> {
    Url::parse(base)
        .and_then(|b| b.join(action))
        .map_err(|_| SessionError::BadUrl { action: s!(action), base: s!(base) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_url_resolves_relative_action() {
        let url = action_url("doLogin", BASE_URL).unwrap();
        assert_eq!(url.as_str(), "https://salislab.net/software/doLogin");
    }

    #[test]
    fn job_request_defaults_algorithm_version() {
        let job = JobRequest::new("t", "ATG", "E. coli");
        assert_eq!(job.algorithm_version, DEFAULT_ALGORITHM_VERSION);
    }
}
