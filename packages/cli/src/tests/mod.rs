mod commands_tests;
