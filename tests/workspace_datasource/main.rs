mod factory_create_tests;
