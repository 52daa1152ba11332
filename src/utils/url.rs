use std::fmt::Display;

/// Abstraction allowing to help with the handling of URLs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    inner: String,
}

impl Url {
    pub fn new(url: String) -> Self {
        Self { inner: url }
    }

    pub fn get_ref(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the last path segment of this URL, query string and fragment
    /// excluded.
    ///
    /// Can be empty if the URL's path ends with a `/` (or is empty itself).
    pub fn filename(&self) -> &str {
        let parsed = match self.inner.find('#') {
            Some(idx) => &self.inner[0..idx],
            None => &self.inner,
        };
        let parsed = match parsed.find('?') {
            Some(idx) => &parsed[0..idx],
            None => parsed,
        };
        match parsed.rfind('/') {
            Some(idx) => &parsed[idx + 1..],
            None => parsed,
        }
    }

    /// Returns the name under which the resource behind this URL should be
    /// saved on disk when the caller did not provide one.
    ///
    /// Falls back to a generic name when the URL's path does not end with a
    /// non-empty segment.
    pub fn default_save_filename(&self) -> String {
        let filename = self.filename();
        if filename.is_empty() {
            "audio".to_owned()
        } else {
            filename.to_owned()
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        assert_eq!(Url::new("http://a.com/dir/file.mp3".to_owned()).filename(), "file.mp3");
        assert_eq!(
            Url::new("http://a.com/dir/file.mp3?token=54#t=4".to_owned()).filename(),
            "file.mp3"
        );
        assert_eq!(
            Url::new("http://a.com/dir/file.mp3#t=4?fake".to_owned()).filename(),
            "file.mp3"
        );
        assert_eq!(Url::new("http://a.com/dir/".to_owned()).filename(), "");
        assert_eq!(Url::new("http://a.com".to_owned()).filename(), "a.com");
        assert_eq!(Url::new("relative/path/tts.wav".to_owned()).filename(), "tts.wav");
        assert_eq!(Url::new(String::new()).filename(), "");
    }

    #[test]
    fn test_default_save_filename() {
        assert_eq!(
            Url::new("http://a.com/speech.mp3?x=1".to_owned()).default_save_filename(),
            "speech.mp3"
        );
        assert_eq!(Url::new("http://a.com/api/".to_owned()).default_save_filename(), "audio");
        assert_eq!(Url::new(String::new()).default_save_filename(), "audio");
    }
}
