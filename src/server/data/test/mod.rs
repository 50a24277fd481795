mod outbox;
mod student;
mod student_group;
