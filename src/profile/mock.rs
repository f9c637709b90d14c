//! In-memory [`ProfileClient`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ProfileClient, ProfileError, ProfileField};
use crate::telegram::TelegramError;

/// How the mock should fail every call.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MockFailure {
    Telegram,
    Disconnected,
    Unexpected,
}

/// A recorded call: the field, the value for setters, and the language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockCall {
    pub field: ProfileField,
    pub value: Option<String>,
    pub lang_code: String,
}

pub(crate) struct MockProfileClient {
    values: Mutex<HashMap<ProfileField, String>>,
    set_result: bool,
    failure: Option<MockFailure>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProfileClient {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            set_result: true,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_value(self, field: ProfileField, value: &str) -> Self {
        self.values.lock().unwrap().insert(field, value.to_owned());
        self
    }

    /// Makes every setter report `false`.
    pub fn refusing(mut self) -> Self {
        self.set_result = false;
        self
    }

    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn value(&self, field: ProfileField) -> Option<String> {
        self.values.lock().unwrap().get(&field).cloned()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Values passed to setters, in call order.
    pub fn set_calls(&self) -> Vec<(ProfileField, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.value.map(|v| (call.field, v)))
            .collect()
    }

    fn record(&self, field: ProfileField, value: Option<&str>, lang_code: &str) {
        self.calls.lock().unwrap().push(MockCall {
            field,
            value: value.map(str::to_owned),
            lang_code: lang_code.to_owned(),
        });
    }

    fn fail(&self) -> Result<(), ProfileError> {
        match self.failure {
            Some(MockFailure::Telegram) => Err(ProfileError::Telegram(TelegramError::Invocation(
                "rpc error 400: BOT_INVALID".to_owned(),
            ))),
            Some(MockFailure::Disconnected) => Err(ProfileError::from(
                TelegramError::Connection("connection reset by peer".to_owned()),
            )),
            Some(MockFailure::Unexpected) => {
                Err(ProfileError::Unexpected("handler state poisoned".to_owned()))
            }
            None => Ok(()),
        }
    }

    fn get(&self, field: ProfileField, lang_code: &str) -> Result<String, ProfileError> {
        self.record(field, None, lang_code);
        self.fail()?;
        Ok(self.value(field).unwrap_or_default())
    }

    fn set(&self, field: ProfileField, value: &str, lang_code: &str) -> Result<bool, ProfileError> {
        self.record(field, Some(value), lang_code);
        self.fail()?;
        if self.set_result {
            self.values.lock().unwrap().insert(field, value.to_owned());
        }
        Ok(self.set_result)
    }
}

#[async_trait]
impl ProfileClient for MockProfileClient {
    async fn get_my_name(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get(ProfileField::Name, lang_code)
    }

    async fn set_my_name(&self, name: &str, lang_code: &str) -> Result<bool, ProfileError> {
        self.set(ProfileField::Name, name, lang_code)
    }

    async fn get_my_description(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get(ProfileField::Description, lang_code)
    }

    async fn set_my_description(
        &self,
        description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError> {
        self.set(ProfileField::Description, description, lang_code)
    }

    async fn get_my_short_description(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get(ProfileField::ShortDescription, lang_code)
    }

    async fn set_my_short_description(
        &self,
        short_description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError> {
        self.set(ProfileField::ShortDescription, short_description, lang_code)
    }
}
