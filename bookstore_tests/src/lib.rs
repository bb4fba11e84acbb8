#[cfg(test)]
mod mock_backend;
