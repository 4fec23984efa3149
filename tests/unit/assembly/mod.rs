mod rorschach;
