//! Cross-component registry tests over the in-memory collaborators.

#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod flows;
