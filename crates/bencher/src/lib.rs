#[derive(Debug, Copy, Clone)]
pub struct BenchCase {
    name: &'static str,
    payload: Payload,
}

impl BenchCase {
    pub const fn new(name: &'static str, payload: Payload) -> Self {
        Self { name, payload }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// A serialized envelope embedded at compile time.
#[derive(Debug, Copy, Clone)]
pub struct Payload {
    file_name: &'static str,
    content: &'static str,
}

impl Payload {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}
