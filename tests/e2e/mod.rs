mod chunky_string;
mod message_passer;
