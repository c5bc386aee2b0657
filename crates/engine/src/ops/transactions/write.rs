mod attachments;
mod create;
mod delete;
mod update;
